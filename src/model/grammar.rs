use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `POST /grammar`. Non-verbs come back as `{ "isVerb": false }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ConjugationTable {
    #[serde(rename = "isVerb", default)]
    pub is_verb: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default)]
    pub pronouns: Vec<String>,

    /// Display order of the tenses in `table`.
    #[serde(default)]
    pub tenses: Vec<String>,

    #[serde(default)]
    pub table: BTreeMap<String, BTreeMap<String, String>>,

    #[serde(default)]
    pub usage: BTreeMap<String, TenseUsage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TenseUsage {
    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default)]
    pub examples: Vec<UsageExample>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct UsageExample {
    #[serde(default)]
    pub sentence: String,

    #[serde(default)]
    pub translation: String,
}
