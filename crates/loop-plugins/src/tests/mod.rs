//! Crate-level integration and BDD tests.

use std::collections::HashMap;
use std::sync::Arc;

use loop_config::{LogLevel, LoggingSnapshot};

use crate::registrar::Registrar;
use crate::registry::LoopRegistry;


#[test]
fn end_to_end_registration_and_build() {
    let logging = LoggingSnapshot::new(LogLevel::Error, false, true);
    let registry = Arc::new(LoopRegistry::new(2112));
    let registrar = Registrar::new(&logging, "grpc", Arc::clone(&registry));

    let (factory, transport) = registrar
        .register_loop("mercury", "/opt/loops/mercury")
        .expect("register");
    assert_eq!(transport, "grpc");

    let command = factory.build_from(&HashMap::<String, String>::new());
    assert_eq!(command.program().to_str(), Some("/opt/loops/mercury"));
    assert_eq!(command.get_env("CL_LOG_LEVEL"), Some("error"));
    assert_eq!(command.get_env("CL_JSON_CONSOLE"), Some("false"));
    assert_eq!(command.get_env("CL_UNIX_TS"), Some("true"));
    assert_eq!(command.get_env("CL_PROMETHEUS_PORT"), Some("2113"));
    assert_eq!(registry.list().len(), 1);
}
