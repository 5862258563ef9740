use serde::{Deserialize, Serialize};

/// Excerpt from an uploaded material, cited as the source of a generated
/// question. Read-only on the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialSnippet {
    pub id: String,
    pub class_material: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SnippetListEnvelope {
    pub material_snippets: Vec<MaterialSnippet>,
}
