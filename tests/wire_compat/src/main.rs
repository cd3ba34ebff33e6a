fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use spa_deploy_protocol::{
        DomainInfo, FileMetadata, PositionStatus, ReleaseVersionRequest, RevokeVersionRequest,
        UpdateUploadingStatusRequest, UploadPosition, UploadingStatus,
    };

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Parses a fixture, re-serializes it and compares the JSON values.
    fn roundtrip_test<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to serialize {name}: {e}"));
        assert_eq!(fixture, reserialized, "wire mismatch for {name}");
        parsed
    }

    #[test]
    fn upload_position() {
        let pos: UploadPosition = roundtrip_test("upload_position.json");
        assert_eq!(pos.version, 4);
        assert_eq!(pos.status, PositionStatus::Uploading);
    }

    #[test]
    fn file_metadata_list() {
        let files: Vec<FileMetadata> = roundtrip_test("file_metadata.json");
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].path, "static/js/main.1a2b3c.js");
        assert_eq!(files[1].length, 0);
    }

    #[test]
    fn update_uploading_status() {
        let req: UpdateUploadingStatusRequest = roundtrip_test("update_uploading_status.json");
        assert_eq!(req.status, UploadingStatus::Finish);
    }

    #[test]
    fn domain_info_list() {
        let domains: Vec<DomainInfo> = roundtrip_test("domain_info.json");
        assert_eq!(domains[0].current_version, Some(3));
        assert_eq!(domains[1].current_version, None);
    }

    #[test]
    fn release_latest_version() {
        let req: ReleaseVersionRequest = roundtrip_test("release_version.json");
        assert_eq!(req.version, None);
    }

    #[test]
    fn revoke_version() {
        let req: RevokeVersionRequest = roundtrip_test("revoke_version.json");
        assert_eq!(req.version, 2);
    }

    #[test]
    fn unknown_position_status_is_rejected() {
        let mut fixture = load_fixture("upload_position.json");
        fixture["status"] = serde_json::json!(7);
        assert!(serde_json::from_value::<UploadPosition>(fixture).is_err());
    }
}
