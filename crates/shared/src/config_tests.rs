use super::config::AppConfig;

#[test]
fn test_load_reads_prefixed_environment() {
    temp_env::with_vars(
        [
            ("CLASSIQ__SERVER__PORT", Some("9090")),
            ("CLASSIQ__DATABASE__URL", Some("postgres://localhost/classiq")),
            ("CLASSIQ__JWT__SECRET", Some("secret")),
            ("CLASSIQ__ATTENDANCE__FACE_MATCH_THRESHOLD", Some("0.7")),
            (
                "CLASSIQ__ATTENDANCE__ALLOWED_NETWORKS",
                Some("10.0.0.0/8,192.168.1.20"),
            ),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.server.port, 9090);
            assert_eq!(config.database.url, "postgres://localhost/classiq");
            assert!((config.attendance.face_match_threshold - 0.7).abs() < f64::EPSILON);
            assert_eq!(
                config.attendance.allowed_networks,
                vec!["10.0.0.0/8".to_string(), "192.168.1.20".to_string()]
            );
        },
    );
}

#[test]
fn test_attendance_defaults_apply() {
    temp_env::with_vars(
        [
            ("CLASSIQ__DATABASE__URL", Some("postgres://localhost/classiq")),
            ("CLASSIQ__JWT__SECRET", Some("secret")),
        ],
        || {
            let config = AppConfig::load().unwrap();
            assert_eq!(config.attendance.timezone, "Asia/Kolkata");
            assert_eq!(config.attendance.qr_default_expiry_secs, 60);
            assert!(config.attendance.allowed_networks.is_empty());
            assert_eq!(
                config.attendance.time_zone().unwrap(),
                chrono_tz::Asia::Kolkata
            );
        },
    );
}

#[test]
fn test_unknown_time_zone_is_rejected() {
    let attendance = super::config::AttendanceConfig {
        timezone: "Mars/Olympus".to_string(),
        ..Default::default()
    };
    assert!(attendance.time_zone().is_err());
}
