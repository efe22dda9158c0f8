use std::sync::atomic::{AtomicU32, Ordering};

/// Generates unique names for test isolation.
///
/// Each test gets a name `test_{process_id}_{test_counter}`, used as its
/// PostgreSQL schema or in its SQLite file name, so tests running in
/// parallel (within or across processes) never see each other's tables.
#[derive(Clone)]
#[allow(dead_code)] // Unused when no backend feature is enabled
pub struct TestIsolation {
    process_id: u32,
    test_counter: u32,
}

#[allow(dead_code)]
static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

#[allow(dead_code)]
impl TestIsolation {
    pub fn new() -> Self {
        Self {
            process_id: std::process::id(),
            test_counter: TEST_COUNTER.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn schema_name(&self) -> String {
        format!("test_{}_{}", self.process_id, self.test_counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_are_unique() {
        let a = TestIsolation::new().schema_name();
        let b = TestIsolation::new().schema_name();

        assert_ne!(a, b);
        assert!(a.starts_with("test_"));
    }

    #[test]
    fn schema_name_format() {
        let name = TestIsolation::new().schema_name();

        // test_{process_id}_{counter}
        let parts: Vec<&str> = name.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "test");
        assert!(parts[1].parse::<u32>().is_ok());
        assert!(parts[2].parse::<u32>().is_ok());
        assert!(name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
    }
}
