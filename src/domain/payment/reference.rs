//! Payment reference generation.

/// Build a fresh reference: `<PREFIX>_<unix-millis>_<8 hex chars>`.
pub fn generate_reference(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}_{}", prefix, millis, &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_prefix_timestamp_and_suffix() {
        let reference = generate_reference("PSK");
        let parts: Vec<&str> = reference.split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "PSK");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn references_are_unique() {
        let a = generate_reference("FLW");
        let b = generate_reference("FLW");
        assert_ne!(a, b);
    }
}
