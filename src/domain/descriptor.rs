use std::collections::BTreeMap;

use serde::Serialize;

pub const SERVICE_NAME: &str = "pygments";
pub const NODE_TYPE: &str = "*ast.CodeBlock";

/// Static capability record advertised to orchestrators through `/discover`.
///
/// Field order is part of the wire contract: `name`, `type`, `attrs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub node_type: &'static str,
    pub attrs: BTreeMap<&'static str, &'static str>,
}

impl ServiceDescriptor {
    pub fn pygments() -> Self {
        let mut attrs = BTreeMap::new();
        attrs.insert("language", "Info");

        Self {
            name: SERVICE_NAME,
            node_type: NODE_TYPE,
            attrs,
        }
    }
}

impl Default for ServiceDescriptor {
    fn default() -> Self {
        Self::pygments()
    }
}
