use hbconv::core::io::mapping::MappingFormat;

pub struct DefaultsConfig {
    pub selection: String,
    pub mapping_format: MappingFormat,
    pub mapping_fallback: Option<MappingFormat>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            selection: "Protein".to_string(),
            mapping_format: MappingFormat::Json,
            mapping_fallback: Some(MappingFormat::Toml),
        }
    }
}
