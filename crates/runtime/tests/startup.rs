use jbridge_core::protocol::ServerConfig;
use jbridge_runtime::{ClasspathConfig, build_default_server, runtime, startup};

// Runs alone in this binary so no other test can have started the runtime.
#[test]
fn test_server_construction_leaves_startup_to_caller() {
    let temp = tempfile::TempDir::new().unwrap();
    let config =
        ClasspathConfig::new().with_application(Some(temp.path().to_string_lossy().into_owned()));

    let worker = std::thread::spawn(move || {
        let _server = build_default_server(&config, ServerConfig::default());
    });
    worker.join().unwrap();
    assert!(runtime().is_none());

    let started = startup();
    assert_eq!(started.callbacks().owner(), Some(std::thread::current().id()));
}
