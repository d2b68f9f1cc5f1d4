#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Creates a temporary manifest; the file is removed when the handle drops
    pub fn create_temp_manifest(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("argvr_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_manifest(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_manifest(content, "json")
    }
}

pub mod routes {
    use argvrouter::pattern::{compile_pattern, CompiledRoute, RouteDefinition};
    use argvrouter::router::RouteTable;

    /// Compiles `(pattern, handler)` pairs, panicking on any compile failure
    pub fn compile_all(patterns: &[(&str, &str)]) -> Vec<CompiledRoute> {
        patterns
            .iter()
            .map(|(pattern, handler)| {
                compile_pattern(pattern, handler)
                    .unwrap_or_else(|e| panic!("pattern '{pattern}' failed to compile: {e}"))
            })
            .collect()
    }

    pub fn table(patterns: &[(&str, &str)]) -> RouteTable {
        let definitions: Vec<RouteDefinition> = patterns
            .iter()
            .map(|(pattern, handler)| RouteDefinition::new(*pattern, *handler))
            .collect();
        RouteTable::compile(&definitions).into_result().unwrap()
    }
}
