// Named query parser
// Rewrites `:name` parameters into positional `?` placeholders so the
// statement can be handed to any driver that only understands positional binds

use crate::error::{Error, Result};
use crate::rows::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The parsed result of a SQL statement with named parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedQuery {
    /// The statement exactly as it was given
    query: String,
    /// The statement with every `:name` replaced by `?`
    parsed: String,
    /// Parameter names in the order they appear, duplicates included
    names: Vec<String>,
}

impl NamedQuery {
    /// Parse a SQL statement with named parameters
    ///
    /// A parameter name starts right after `:` and runs until the next space
    /// or the end of the statement. Punctuation is part of the name, so
    /// `(:id)` yields the name `id)`. The space that ends a name is kept in
    /// the rewritten statement.
    ///
    /// Fails with `Error::MalformedNamedQuery` when a `:` is followed by a
    /// space, another `:` or the end of the statement.
    pub fn parse(query: &str) -> Result<NamedQuery> {
        let mut parsed = String::with_capacity(query.len());
        let mut names = Vec::new();
        let mut rest = query;

        while let Some(start) = rest.find(':') {
            parsed.push_str(&rest[..start]);
            parsed.push('?');

            rest = &rest[start + 1..];

            let end = rest.find(' ').unwrap_or(rest.len());
            let name = &rest[..end];
            if name.is_empty() || name.starts_with(':') {
                return Err(Error::MalformedNamedQuery);
            }

            names.push(name.to_string());
            rest = &rest[end..];
        }

        parsed.push_str(rest);

        tracing::trace!(params = names.len(), "parsed named query");

        Ok(NamedQuery {
            query: query.to_string(),
            parsed,
            names,
        })
    }

    /// The original statement
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The statement rewritten with positional placeholders
    pub fn parsed(&self) -> &str {
        &self.parsed
    }

    /// Parameter names in placeholder order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of placeholders introduced by the rewrite
    pub fn placeholder_count(&self) -> usize {
        self.names.len()
    }

    /// True if the statement had no named parameters
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parameter names with duplicates removed, keeping first occurrence order
    pub fn distinct_names(&self) -> Vec<&str> {
        let mut seen = Vec::with_capacity(self.names.len());
        for name in &self.names {
            if !seen.contains(&name.as_str()) {
                seen.push(name.as_str());
            }
        }
        seen
    }

    /// Build the positional argument list for the rewritten statement
    ///
    /// Every placeholder gets its own copy of the named value, so a name that
    /// appears twice is bound twice.
    pub fn bind(&self, params: &HashMap<String, Value>) -> Result<Vec<Value>> {
        self.names
            .iter()
            .map(|name| {
                params
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::MissingParameter { name: name.clone() })
            })
            .collect()
    }
}
