//! Unit tests for individual bridge components

#[cfg(test)]
mod classification_tests {
    use lescan_bridge::{classify, DeviceType, DeviceTypeTag};

    #[test]
    fn test_only_le_is_hm10() {
        for raw in -1..8 {
            let device_type = DeviceType::from_raw(raw);
            let expected = if raw == 2 {
                DeviceTypeTag::Hm10
            } else {
                DeviceTypeTag::Classic
            };
            assert_eq!(classify(device_type), expected, "raw type {}", raw);
        }
    }

    #[test]
    fn test_tag_strings() {
        assert_eq!(DeviceTypeTag::Hm10.as_str(), "HM10");
        assert_eq!(DeviceTypeTag::Classic.as_str(), "CLASSIC");
    }
}

#[cfg(test)]
mod config_tests {
    use lescan_bridge::BridgeConfig;

    #[test]
    fn test_config_json_roundtrip_keeps_fields() {
        let config = BridgeConfig {
            log_level: Some("debug".to_string()),
            log_tag: "Vario".to_string(),
            ..BridgeConfig::default()
        };

        let json = serde_json::to_vec(&config).expect("Should serialize");
        let parsed = BridgeConfig::from_json(&json).expect("Should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert!(BridgeConfig::from_json(br#"{"log_tag":""}"#).is_err());
    }
}

#[cfg(test)]
mod collector_tests {
    use lescan_bridge::{DeviceCollector, DeviceTypeTag, ScanSink};

    #[test]
    fn test_name_learned_after_first_sighting() {
        let collector = DeviceCollector::new();
        collector.on_le_scan("AA:BB:CC:DD:EE:FF", None, DeviceTypeTag::Hm10);
        assert_eq!(collector.get("AA:BB:CC:DD:EE:FF").unwrap().name, None);

        collector.on_le_scan("AA:BB:CC:DD:EE:FF", Some("Vario01"), DeviceTypeTag::Hm10);
        let device = collector.get("AA:BB:CC:DD:EE:FF").unwrap();
        assert_eq!(device.name.as_deref(), Some("Vario01"));
        assert_eq!(device.seen_count, 2);
    }
}
