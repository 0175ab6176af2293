pub mod loader;

use std::path::Path;
use std::sync::OnceLock;

use uuid::Uuid;

use crate::domain::error::{RegistryError, SchemaError};
use crate::domain::schema::{DefaultGenerator, FieldDescriptor, FieldSet};

/// Processors accepted by the `postproc_results` check type.
pub const KNOWN_PROCESSORS: [&str; 9] = [
    "fasta-summary",
    "bam-index-stats",
    "vcf-header",
    "flagstat",
    "bcftools_stats",
    "miqa_steps_log",
    "bam_reads_by_name",
    "bam_region_sample",
    "miqa_ls_txt",
];

pub const ASSERTION_ID: DefaultGenerator =
    DefaultGenerator::new("assertion_id", generate_assertion_id);

const GENERATORS: [DefaultGenerator; 1] = [ASSERTION_ID];

/// `assertion_` followed by 8 hex characters of a fresh v4 UUID.
pub fn generate_assertion_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("assertion_{}", &hex[..8])
}

pub fn generator_by_name(name: &str) -> Option<DefaultGenerator> {
    GENERATORS
        .iter()
        .copied()
        .find(|generator| generator.name() == name)
}

/// Check-type name to field schema, sharing one core field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    core: FieldSet,
    check_types: Vec<(String, FieldSet)>,
}

impl SchemaRegistry {
    pub fn new(core: FieldSet) -> Self {
        Self {
            core,
            check_types: Vec::new(),
        }
    }

    /// Adds a check type, replacing an earlier definition with the same name.
    pub fn with_check_type(mut self, name: impl Into<String>, fields: FieldSet) -> Self {
        let name = name.into();
        match self
            .check_types
            .iter_mut()
            .find(|(existing, _)| *existing == name)
        {
            Some((_, slot)) => *slot = fields,
            None => self.check_types.push((name, fields)),
        }
        self
    }

    /// Process-wide built-in registry.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: OnceLock<SchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(builtin_registry)
    }

    /// Loads a registry from a JSON, YAML or TOML file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        loader::load_path(path)
    }

    pub fn core_fields(&self) -> &FieldSet {
        &self.core
    }

    /// Check-type names in definition order.
    pub fn check_types(&self) -> Vec<&str> {
        self.check_types
            .iter()
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Type-specific fields only, without the core set.
    pub fn specific_fields(&self, check_type: &str) -> Result<&FieldSet, RegistryError> {
        self.check_types
            .iter()
            .find(|(name, _)| name == check_type)
            .map(|(_, fields)| fields)
            .ok_or_else(|| RegistryError::UnknownCheckType {
                name: check_type.to_string(),
                known: self.check_types().join(", "),
            })
    }

    /// Core fields overlaid with the check type's own fields.
    pub fn fields_for(&self, check_type: &str) -> Result<FieldSet, RegistryError> {
        let specific = self.specific_fields(check_type)?;
        Ok(self.core.overlay(specific))
    }
}

fn builtin_registry() -> SchemaRegistry {
    let core = FieldSet::new()
        .with("name", FieldDescriptor::string().required())
        .with(
            "id",
            FieldDescriptor::string()
                .optional()
                .default_generated(ASSERTION_ID),
        )
        .with(
            "failtype",
            FieldDescriptor::select(["fail", "warn"]).default_value("fail"),
        )
        .with("check_type", FieldDescriptor::from_parent());

    let postproc_results = FieldSet::new()
        .with(
            "processor_key",
            FieldDescriptor::select(KNOWN_PROCESSORS).required(),
        )
        .with(
            "stat",
            FieldDescriptor::expression()
                .placeholder("e.g. data.format == 'fasta' and data.valid_format"),
        )
        .with(
            "postprocessed_file_pattern",
            FieldDescriptor::string().placeholder("e.g. .*fasta"),
        )
        // Key spelling is part of the consumer's wire format.
        .with("item_typ1e", FieldDescriptor::fixed("outputfile"));

    let tabular_mdo_eval = FieldSet::new()
        .with(
            "stat",
            FieldDescriptor::expression().placeholder("e.g. data.rows.map('%PF').mean() > 0.9"),
        )
        .with(
            "file_rules",
            FieldDescriptor::string().placeholder(r"e.g. .*\.csv$"),
        )
        .with("delimiter", FieldDescriptor::string().placeholder(","))
        .with(
            "comment_character",
            FieldDescriptor::string().optional().placeholder("#"),
        );

    SchemaRegistry::new(core)
        .with_check_type("postproc_results", postproc_results)
        .with_check_type("tabular_mdo_eval", tabular_mdo_eval)
}
