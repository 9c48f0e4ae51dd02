//! Named path patterns with typed placeholder fields
//!
//! A template is configuration: loaded once per session, immutable
//! afterwards. Its definition is a mini-language of `{fieldname}`
//! placeholders inside path segments, compiled at construction into an
//! anchored regex matcher.

use regex::Regex;

use crate::error::{Result, TemplateError};
use crate::field::{FieldMap, TemplateKey};

#[derive(Debug, Clone)]
enum Token {
    Literal(String),
    /// Index into the key table
    Field(usize),
}

/// A named path pattern with typed placeholder fields
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    definition: String,
    keys: Vec<TemplateKey>,
    tokens: Vec<Token>,
    matcher: Regex,
}

impl Template {
    /// Compile a template from its definition string and key table
    ///
    /// Fails if the definition has unbalanced braces or references a field
    /// with no declared key. A field may appear more than once; repeated
    /// occurrences must resolve to the same value at extraction time.
    pub fn new(
        name: impl Into<String>,
        definition: impl Into<String>,
        keys: Vec<TemplateKey>,
    ) -> Result<Self> {
        let name = name.into();
        let definition = definition.into();
        let tokens = parse_definition(&name, &definition, &keys)?;

        let mut pattern = String::from("^");
        for token in &tokens {
            match token {
                Token::Literal(text) => pattern.push_str(&regex::escape(text)),
                Token::Field(idx) => {
                    pattern.push('(');
                    pattern.push_str(keys[*idx].pattern());
                    pattern.push(')');
                }
            }
        }
        pattern.push('$');

        let matcher = Regex::new(&pattern).map_err(|e| TemplateError::InvalidDefinition {
            template: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Template {
            name,
            definition,
            keys,
            tokens,
            matcher,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn keys(&self) -> &[TemplateKey] {
        &self.keys
    }

    /// Look up a key by field name
    pub fn key(&self, name: &str) -> Option<&TemplateKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// True iff `path` structurally matches this template's field grammar
    pub fn validate(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    /// Extract the field values embedded in `path`
    ///
    /// Fails with a format error when the path does not match, or when two
    /// occurrences of the same field disagree.
    pub fn fields_from_path(&self, path: &str) -> Result<FieldMap> {
        let captures = self
            .matcher
            .captures(path)
            .ok_or_else(|| self.format_error(path))?;

        let mut fields = FieldMap::new();
        let mut group = 0;
        for token in &self.tokens {
            let idx = match token {
                Token::Field(idx) => *idx,
                Token::Literal(_) => continue,
            };
            group += 1;
            let raw = captures
                .get(group)
                .map(|m| m.as_str())
                .ok_or_else(|| self.format_error(path))?;
            let key = &self.keys[idx];
            let value = key.value_from_str(raw)?;
            match fields.get(&key.name) {
                Some(previous) if previous != &value => {
                    return Err(self.format_error(path));
                }
                Some(_) => {}
                None => fields.insert(key.name.clone(), value),
            }
        }
        Ok(fields)
    }

    /// Render a path from a complete field map
    ///
    /// Fails with a missing-field error when a referenced field is absent.
    /// Fields present in the map but not referenced by the definition are
    /// ignored.
    pub fn apply_fields(&self, fields: &FieldMap) -> Result<String> {
        let mut path = String::with_capacity(self.definition.len());
        for token in &self.tokens {
            match token {
                Token::Literal(text) => path.push_str(text),
                Token::Field(idx) => {
                    let key = &self.keys[*idx];
                    let value =
                        fields
                            .get(&key.name)
                            .ok_or_else(|| TemplateError::MissingField {
                                template: self.name.clone(),
                                field: key.name.clone(),
                            })?;
                    path.push_str(&key.str_from_value(value)?);
                }
            }
        }
        Ok(path)
    }

    fn format_error(&self, path: &str) -> TemplateError {
        TemplateError::Format {
            template: self.name.clone(),
            path: path.to_string(),
        }
    }
}

fn parse_definition(name: &str, definition: &str, keys: &[TemplateKey]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = definition.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                let mut field = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(TemplateError::InvalidDefinition {
                                template: name.to_string(),
                                reason: format!("unclosed placeholder in '{}'", definition),
                            });
                        }
                        Some(c) => field.push(c),
                    }
                }
                let idx = keys.iter().position(|k| k.name == field).ok_or_else(|| {
                    TemplateError::UnknownKey {
                        template: name.to_string(),
                        field,
                    }
                })?;
                tokens.push(Token::Field(idx));
            }
            '}' => {
                return Err(TemplateError::InvalidDefinition {
                    template: name.to_string(),
                    reason: format!("unbalanced '}}' in '{}'", definition),
                });
            }
            _ => literal.push(ch),
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}
