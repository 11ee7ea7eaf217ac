//! Name templates and the localisation tables used to resolve them.
//!
//! Names in the gamestate are either literal strings or templates such as
//! `name={ key="%ADJECTIVE%" variables={ { key="adjective" value={ key="SPEC_Human" } } ... } }`.

use std::sync::OnceLock;

use ahash::AHashMap;
use regex::Regex;
use save_parser::{Decode, Record};

pub const FORMAT_ADJECTIVE: &str = "%ADJECTIVE%";
pub const FORMAT_ADJ: &str = "%ADJ%";
pub const FORMAT_KEY_APPEND: &str = "1";

const VARIABLE_ADJECTIVE: &str = "adjective";

/// Templated name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Name {
    pub key: String,
    pub variables: Vec<NameVariable>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameVariable {
    pub key: String,
    pub value: Name,
}

/// Name block carrying only a key (fleets, sectors)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameKey {
    pub key: String,
}

impl Record for Name {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "key" => &mut self.key,
            "variables" => &mut self.variables,
            _ => return None,
        };
        Some(field)
    }
}

impl Record for NameVariable {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        let field: &mut dyn Decode = match key {
            "key" => &mut self.key,
            "value" => &mut self.value,
            _ => return None,
        };
        Some(field)
    }
}

impl Record for NameKey {
    fn field(&mut self, key: &str) -> Option<&mut dyn Decode> {
        match key {
            "key" => Some(&mut self.key),
            _ => None,
        }
    }
}

/// Localisation lookup tables, built once and shared by reference
#[derive(Debug, Clone)]
pub struct NameTables {
    pub country_formats: AHashMap<String, String>,
    pub empire_names: AHashMap<String, String>,
    pub species_names: AHashMap<String, String>,
    pub prescripted_country_names: AHashMap<String, String>,
    pub planet_names: AHashMap<String, String>,
    pub default_names: AHashMap<String, String>,
}

impl Default for NameTables {
    fn default() -> Self {
        let mut planet_names = AHashMap::new();
        planet_names.insert("PLANET_NAME_FORMAT".to_string(), "<PARENT> <NUMERAL>".to_string());

        Self {
            country_formats: AHashMap::new(),
            empire_names: AHashMap::new(),
            species_names: AHashMap::new(),
            prescripted_country_names: AHashMap::new(),
            planet_names,
            default_names: AHashMap::new(),
        }
    }
}

impl NameTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build tables from the game's localisation files
    pub fn from_localisation(
        country_formats: &str,
        empire_names: &str,
        species_names: &str,
        prescripted_country_names: &str,
    ) -> Self {
        Self {
            country_formats: parse_localisation(country_formats),
            empire_names: parse_localisation(empire_names),
            species_names: parse_localisation(species_names),
            prescripted_country_names: parse_localisation(prescripted_country_names),
            ..Self::default()
        }
    }
}

static LINE_RE: OnceLock<Regex> = OnceLock::new();

fn line_re() -> &'static Regex {
    LINE_RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z0-9_.\-]*):[0-9] "([^"]*)""#).expect("valid localisation line pattern")
    })
}

/// Parse `KEY:0 "Text"` lines of a localisation file
pub fn parse_localisation(text: &str) -> AHashMap<String, String> {
    line_re()
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

impl Name {
    /// Look the key up in the table its prefix selects, falling back to the key itself
    pub fn resolve(&self, tables: &NameTables) -> String {
        let names = if self.key.starts_with("EMPIRE_DESIGN_") {
            Some(&tables.empire_names)
        } else if self.key.starts_with("SPEC_") {
            Some(&tables.species_names)
        } else if self.key.starts_with("PRESCRIPTED_") {
            Some(&tables.prescripted_country_names)
        } else if let Some(rest) = self.key.strip_prefix("NAME_") {
            // NAME_ keys are too many to localise, the identifier reads well enough
            return rest.replace('_', " ");
        } else {
            None
        };

        names
            .and_then(|names| names.get(&self.key))
            .cloned()
            .unwrap_or_else(|| self.key.clone())
    }

    /// Expand the template using `formats` for the outer key
    pub fn format(&self, formats: &AHashMap<String, String>, tables: &NameTables) -> String {
        let mut components: Vec<String> = Vec::new();

        match self.key.as_str() {
            FORMAT_ADJECTIVE | FORMAT_ADJ | FORMAT_KEY_APPEND => {
                let seek_adjective = self.key == FORMAT_ADJECTIVE;
                for variable in &self.variables {
                    match variable.key.as_str() {
                        VARIABLE_ADJECTIVE => {
                            if seek_adjective {
                                components.insert(0, variable.value.resolve(tables));
                            }
                        }
                        FORMAT_KEY_APPEND => components.push(variable.value.format(formats, tables)),
                        other => components.push(other.to_string()),
                    }
                }
            }
            _ => {
                let (template, substitute) = match formats.get(&self.key) {
                    Some(format) => (format.clone(), true),
                    None => (self.resolve(tables), false),
                };
                components.push(template);

                for variable in &self.variables {
                    if variable.key == FORMAT_KEY_APPEND {
                        components.push(variable.value.format(formats, tables));
                        continue;
                    }
                    if !substitute {
                        continue;
                    }

                    let sub = variable.value.format(&tables.default_names, tables);
                    components[0] = components[0]
                        .replace(&format!("<{}>", variable.key), &sub)
                        .replace(&format!("[{}]", variable.key), &sub);
                }
            }
        }

        components.join(" ")
    }
}
