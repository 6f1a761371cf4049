//! Tests for the dispatch pipeline: capability gates, binding semantics,
//! and the two-tier error-handling policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use courser::{BasicHandler, ParamKind, ParamSpec, RouteHandler, Router, RouterError};
use http::Method;
use serde_json::json;


fn tag(tag: &'static str) -> Arc<dyn RouteHandler> {
    BasicHandler::new()
        .implement(vec![], move |_| Ok(json!(tag)))
        .build()
}

#[test]
fn empty_registry_yields_no_outcome() {
    tracing_util::init();
    let router = Router::for_request(Method::GET, "/anything", "");

    assert_eq!(router.execute().unwrap(), None);
}

#[test]
fn first_registration_wins_on_rebind() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/a", "");
    router.bind("/a", tag("h1"));
    router.bind("/a", tag("h2"));

    assert_eq!(router.execute().unwrap(), Some(json!("h1")));
}

#[test]
fn unbind_removes_the_registration() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/a", "");
    router.bind("/a", tag("h1"));
    router.unbind("/a");

    assert_eq!(router.execute().unwrap(), None);
}

#[test]
fn unresolved_named_handler_yields_no_outcome() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/ghost", "");
    router.bind("/ghost", "NoSuchProvider");

    assert_eq!(router.execute().unwrap(), None);
}

#[test]
fn bind_many_resolves_providers_and_skips_junk_entries() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/route/15", "");
    router.register_provider("CountHandler", || {
        BasicHandler::new()
            .allow(Method::GET)
            .implement(vec![ParamSpec::new("count", ParamKind::Int)], |args| {
                Ok(json!(args[0].as_int()))
            })
            .build()
    });
    router.bind_many([("/route/{count}", "CountHandler"), ("", "Ignored")]);

    assert_eq!(router.execute().unwrap(), Some(json!(15)));
}

#[test]
fn method_gate_precedes_parameter_resolution() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/gate", "");
    // The descriptor below would fail resolution (required int with no
    // value); the method gate must fire first.
    router.bind(
        "/gate",
        BasicHandler::new()
            .allow(Method::POST)
            .implement(vec![ParamSpec::new("missing", ParamKind::Int)], |_| {
                Ok(json!("unreachable"))
            })
            .build(),
    );

    let err = router.execute().unwrap_err();
    assert!(matches!(err, RouterError::MethodNotAllowed { ref route } if route == "/gate"));
    assert_eq!(err.status_code(), 405);
    assert_eq!(err.route(), Some("/gate"));
}

#[test]
fn missing_implementation_raises_not_implemented() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/stub", "");
    router.bind("/stub", BasicHandler::new().allow(Method::GET).build());

    let err = router.execute().unwrap_err();
    assert!(matches!(err, RouterError::NotImplemented { ref route } if route == "/stub"));
    assert_eq!(err.status_code(), 501);
}

#[test]
fn per_route_error_handler_recovers_invocation_failure() {
    tracing_util::init();
    let global_called = Arc::new(AtomicBool::new(false));
    let global_called_probe = Arc::clone(&global_called);

    let mut router = Router::for_request(Method::GET, "/boom", "");
    router.bind(
        "/boom",
        BasicHandler::new()
            .implement(vec![], |_| anyhow::bail!("database unavailable"))
            .on_error(|err| json!({ "recovered": err.to_string() }))
            .build(),
    );
    router.catch(move |_| {
        global_called_probe.store(true, Ordering::SeqCst);
        json!("global")
    });

    let outcome = router.execute().unwrap().unwrap();
    assert_eq!(
        outcome["recovered"],
        json!("handler invocation failed: database unavailable")
    );
    // The per-route tier settled it; the global fallback stays untouched.
    assert!(!global_called.load(Ordering::SeqCst));
}

#[test]
fn per_route_error_handler_sees_resolution_failures() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/needs-int", "");
    router.bind(
        "/needs-int",
        BasicHandler::new()
            .implement(vec![ParamSpec::new("count", ParamKind::Int)], |_| {
                Ok(json!("unreachable"))
            })
            .on_error(|err| json!(err.parameter_type()))
            .build(),
    );

    assert_eq!(router.execute().unwrap(), Some(json!("int")));
}

#[test]
fn global_fallback_handles_unrecovered_failures() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/boom", "");
    router.bind(
        "/boom",
        BasicHandler::new()
            .implement(vec![], |_| anyhow::bail!("nope"))
            .build(),
    );
    router.catch(|err| json!({ "status": err.status_code() }));

    assert_eq!(
        router.execute().unwrap(),
        Some(json!({ "status": 500 }))
    );
}

#[test]
fn global_fallback_receives_method_gate_failures() {
    tracing_util::init();
    let mut router = Router::for_request(Method::DELETE, "/gate", "");
    // A per-route error handler does not catch gate failures; they go
    // straight to the global tier.
    router.bind(
        "/gate",
        BasicHandler::new()
            .allow(Method::GET)
            .implement(vec![], |_| Ok(json!("unreachable")))
            .on_error(|_| json!("per-route"))
            .build(),
    );
    router.catch(|err| json!({ "status": err.status_code() }));

    assert_eq!(
        router.execute().unwrap(),
        Some(json!({ "status": 405 }))
    );
}

#[test]
fn unhandled_failures_propagate_to_the_caller() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/boom", "");
    router.bind(
        "/boom",
        BasicHandler::new()
            .implement(vec![], |_| anyhow::bail!("original failure"))
            .build(),
    );

    let err = router.execute().unwrap_err();
    assert!(matches!(err, RouterError::Invocation(_)));
    assert!(err.to_string().contains("original failure"));
}

#[test]
fn last_registered_global_fallback_wins() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/boom", "");
    router.bind(
        "/boom",
        BasicHandler::new()
            .implement(vec![], |_| anyhow::bail!("nope"))
            .build(),
    );
    router.catch(|_| json!("first"));
    router.catch(|_| json!("second"));

    assert_eq!(router.execute().unwrap(), Some(json!("second")));
}

#[test]
fn user_scenario_end_to_end() {
    tracing_util::init();
    let mut router = Router::for_request(Method::GET, "/users/42", "trace=1");
    router.bind(
        "/users/{id}",
        BasicHandler::new()
            .allow(Method::GET)
            .implement(vec![ParamSpec::new("id", ParamKind::Str)], |args| {
                let id = args[0].as_str().unwrap_or_default();
                Ok(json!(format!("user:{id}")))
            })
            .build(),
    );

    assert_eq!(router.execute().unwrap(), Some(json!("user:42")));
}

#[test]
fn handler_allowing_every_method_accepts_any_verb() {
    tracing_util::init();
    let mut router = Router::for_request(Method::PATCH, "/open", "");
    router.bind("/open", tag("open"));

    assert_eq!(router.execute().unwrap(), Some(json!("open")));
}
