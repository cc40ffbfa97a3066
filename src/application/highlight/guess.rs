//! Content-based language detection used when a language hint is unknown.
//!
//! Detection runs in three stages: grammar first-line rules (shebangs,
//! modelines, XML/PHP preambles), then weighted content signatures, then plain
//! text. The result depends only on the input text.

use syntect::parsing::{SyntaxReference, SyntaxSet};

/// Minimum signature score needed before a guess beats plain text.
const MIN_SCORE: u32 = 2;

struct Signature {
    token: &'static str,
    /// Markers are matched against the lowercased text.
    case_insensitive: bool,
    markers: &'static [(&'static str, u32)],
}

// Order matters: on equal scores the earlier entry wins.
const SIGNATURES: &[Signature] = &[
    Signature {
        token: "sql",
        case_insensitive: true,
        markers: &[
            ("select ", 3),
            ("insert into ", 4),
            ("create table ", 4),
            ("delete from ", 4),
            ("update ", 1),
            (" from ", 2),
            (" where ", 2),
            (" join ", 2),
            ("group by ", 2),
            ("order by ", 2),
        ],
    },
    Signature {
        token: "py",
        case_insensitive: false,
        markers: &[
            ("def ", 2),
            ("elif ", 3),
            ("import ", 1),
            ("from __future__", 4),
            ("print(", 2),
            ("self.", 2),
            ("__init__", 3),
            ("None", 1),
            ("True", 1),
        ],
    },
    Signature {
        token: "rs",
        case_insensitive: false,
        markers: &[
            ("fn ", 2),
            ("let mut ", 3),
            ("pub fn ", 3),
            ("impl ", 2),
            ("println!", 3),
            ("::", 1),
            ("-> ", 1),
            ("&self", 2),
        ],
    },
    Signature {
        token: "go",
        case_insensitive: false,
        markers: &[
            ("package ", 3),
            ("func ", 2),
            (":= ", 2),
            ("fmt.", 3),
        ],
    },
    Signature {
        token: "js",
        case_insensitive: false,
        markers: &[
            ("function", 2),
            ("console.log", 3),
            ("const ", 1),
            ("=> ", 1),
            ("===", 2),
            ("document.", 2),
            ("require(", 2),
        ],
    },
    Signature {
        token: "c",
        case_insensitive: false,
        markers: &[
            ("#include", 4),
            ("int main", 3),
            ("printf(", 2),
            ("->", 1),
        ],
    },
    Signature {
        token: "rb",
        case_insensitive: false,
        markers: &[
            ("puts ", 3),
            ("require '", 3),
            ("attr_accessor", 4),
            ("\nend", 1),
        ],
    },
    Signature {
        token: "sh",
        case_insensitive: false,
        markers: &[("echo ", 2), ("\nfi", 2), ("$(", 1), ("export ", 1), ("then\n", 2)],
    },
    Signature {
        token: "html",
        case_insensitive: true,
        markers: &[
            ("<!doctype html", 5),
            ("<html", 4),
            ("<div", 2),
            ("<body", 3),
            ("</", 1),
        ],
    },
    Signature {
        token: "css",
        case_insensitive: true,
        markers: &[("color:", 2), ("margin:", 2), ("padding:", 2), ("px;", 2)],
    },
    Signature {
        token: "json",
        case_insensitive: false,
        markers: &[("{\"", 2), ("\": ", 1), ("\":", 1)],
    },
    Signature {
        token: "yaml",
        case_insensitive: false,
        markers: &[("---\n", 2), ("- name:", 2), (":\n  ", 1)],
    },
    Signature {
        token: "diff",
        case_insensitive: false,
        markers: &[("--- a/", 3), ("+++ b/", 3), ("@@ -", 3)],
    },
];

/// Pick a grammar for `text`. Never fails: falls back to plain text.
pub(crate) fn guess_syntax<'a>(syntax_set: &'a SyntaxSet, text: &str) -> &'a SyntaxReference {
    if let Some(syntax) = text
        .lines()
        .next()
        .and_then(|line| syntax_set.find_syntax_by_first_line(line))
    {
        return syntax;
    }

    rank_signatures(text)
        .into_iter()
        .find_map(|token| syntax_set.find_syntax_by_token(token))
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}

/// Tokens of every signature that clears [`MIN_SCORE`], best first.
fn rank_signatures(text: &str) -> Vec<&'static str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let mut scored: Vec<(u32, usize, &'static str)> = SIGNATURES
        .iter()
        .enumerate()
        .filter_map(|(index, signature)| {
            let haystack = if signature.case_insensitive {
                lowered.as_str()
            } else {
                text
            };
            let score: u32 = signature
                .markers
                .iter()
                .filter(|(marker, _)| haystack.contains(marker))
                .map(|(_, weight)| weight)
                .sum();
            (score >= MIN_SCORE).then_some((score, index, signature.token))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, token)| token).collect()
}
