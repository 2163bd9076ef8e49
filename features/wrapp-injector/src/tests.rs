use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use super::*;

#[derive(Debug, PartialEq)]
struct Db {
    host: String,
}

struct Repo {
    db: Arc<Db>,
}

fn db() -> Db {
    Db {
        host: "x".to_string(),
    }
}

#[test]
fn values_resolve_to_themselves_even_when_empty() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("zero", 0_u32)?
        .value("none", None::<u8>)?
        .value("unit", ())?
        .value("empty", String::new())?;

    assert_eq!(*injector.get_as::<u32>("zero")?.unwrap(), 0);
    assert_eq!(*injector.get_as::<Option<u8>>("none")?.unwrap(), None);
    assert!(injector.get_as::<()>("unit")?.is_some());
    assert_eq!(*injector.get_as::<String>("empty")?.unwrap(), "");
    Ok(())
}

#[test]
fn repository_scenario() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("db", db())?
        .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?;

    let first = injector.get_as::<Repo>("repo")?.unwrap();
    assert_eq!(*first.db, db());

    let second = injector.get_as::<Repo>("repo")?.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // The dependency handed to the factory is the registered value itself
    let registered = injector.get_as::<Db>("db")?.unwrap();
    assert!(Arc::ptr_eq(&first.db, &registered));
    Ok(())
}

#[test]
fn factories_run_once() -> Result<(), InjectorError> {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut injector = Injector::new();
    injector.service_with("counted", Vec::<String>::new(), move || {
        counter.fetch_add(1, Ordering::SeqCst);
        "built".to_string()
    })?;

    assert_eq!(calls.load(Ordering::SeqCst), 0, "nothing is built on registration");

    let first = injector.get("counted")?.unwrap();
    let second = injector.inject("counted")?.unwrap();
    assert!(first.ptr_eq(&second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn dependencies_are_passed_in_declared_order() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("a", "A".to_string())?
        .value("b", "B".to_string())?
        .service_with("ba", ["b", "a"], |first: Arc<String>, second: Arc<String>| {
            format!("{first}{second}")
        })?;

    assert_eq!(*injector.get_as::<String>("ba")?.unwrap(), "BA");
    Ok(())
}

#[test]
fn inferred_dependencies_match_explicit_ones() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("a", 2_u32)?
        .value("b", 3_u32)?
        .service_with("explicit", ["a", "b"], |a: Arc<u32>, b: Arc<u32>| *a * 10 + *b)?
        .service(
            "inferred",
            crate::signature!(|a: Arc<u32>, b: Arc<u32>| *a * 10 + *b),
        )?
        .service(
            "from_fn",
            crate::signature!(fn combine(a: Arc<u32>, b: Arc<u32>) -> u32 {
                *a * 10 + *b
            }),
        )?;

    let explicit = injector.get_as::<u32>("explicit")?.unwrap();
    assert_eq!(*explicit, 23);
    assert_eq!(*injector.get_as::<u32>("inferred")?.unwrap(), 23);
    assert_eq!(*injector.get_as::<u32>("from_fn")?.unwrap(), 23);
    Ok(())
}

#[test]
fn attached_dependency_list_wins_over_parameter_names() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector.value("primary", db())?.service(
        "repo",
        crate::signature!(|db: Arc<Db>| Repo { db }).inject(["primary"]),
    )?;

    assert_eq!(injector.get_as::<Repo>("repo")?.unwrap().db.host, "x");
    Ok(())
}

#[test]
fn unknown_names_are_not_errors() -> Result<(), InjectorError> {
    let injector = Injector::new();
    assert!(injector.get("nothing")?.is_none());
    assert!(injector.get_as::<Db>("nothing")?.is_none());
    assert!(!injector.contains("nothing"));
    Ok(())
}

#[test]
fn first_registration_wins() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector.value("name", 1_u8)?.value("name", 2_u8)?;

    assert_eq!(injector.len(), 2);
    assert_eq!(*injector.get_as::<u8>("name")?.unwrap(), 1);
    Ok(())
}

#[test]
fn duplicates_can_be_rejected() -> Result<(), InjectorError> {
    let config = InjectorConfig::default().duplicates(DuplicatePolicy::Reject);
    let mut injector = Injector::with_config(config);
    injector.value("name", 1_u8)?;

    let err = injector.value("name", 2_u8).unwrap_err();
    assert!(matches!(err, RegisterError::Duplicate(name) if name == "name"));
    assert_eq!(injector.len(), 1);
    Ok(())
}

#[test]
fn reserved_names_are_rejected() {
    let mut injector = Injector::new();
    for name in ["get", "clone", "$internal"] {
        let err = injector.value(name, 1_u8).unwrap_err();
        assert!(matches!(err, RegisterError::ReservedName(_)), "{name}");
    }
    assert!(injector.is_empty());

    let mut permissive =
        Injector::with_config(InjectorConfig::default().reserved(ReservedNames::none()));
    assert!(permissive.value("get", 1_u8).is_ok());
}

#[test]
fn dependency_count_must_match_factory() {
    let mut injector = Injector::new();
    let err = injector
        .service_with("repo", ["db", "cache"], |db: Arc<Db>| Repo { db })
        .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::ArityMismatch {
            declared: 2,
            expected: 1,
            ..
        }
    ));

    let err = injector
        .service("repo", Signature::new("fn repo(db, cache)", |db: Arc<Db>| Repo { db }))
        .unwrap_err();
    assert!(matches!(err, RegisterError::Signature { .. }));
    assert!(injector.is_empty());
}

#[test]
fn cycles_are_detected() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .service_with("a", ["b"], |b: Instance| b.type_name())?
        .service_with("b", ["a"], |a: Instance| a.type_name())?
        .service_with("self", ["self"], |me: Instance| me.type_name())?;

    match injector.get("a") {
        Err(ResolveError::CycleDetected { name, chain }) => {
            assert_eq!(name, "a");
            assert_eq!(chain, vec!["a", "b", "a"]);
        }
        other => panic!("expected a cycle, got {other:?}"),
    }

    assert!(matches!(
        injector.get("self"),
        Err(ResolveError::CycleDetected { chain, .. }) if chain == ["self", "self"]
    ));

    // A failed resolution leaves nothing behind, the next call fails the same way
    assert!(matches!(
        injector.get("b"),
        Err(ResolveError::CycleDetected { chain, .. }) if chain == ["b", "a", "b"]
    ));
    Ok(())
}

#[test]
fn missing_dependency_names_both_sides() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?
        .service_with("app", ["repo"], |repo: Arc<Repo>| repo.db.host.clone())?;

    match injector.get("app") {
        Err(ResolveError::MissingDependency {
            dependency,
            required_by,
        }) => {
            assert_eq!(dependency, "db");
            assert_eq!(required_by, "repo");
        }
        other => panic!("expected a missing dependency, got {other:?}"),
    }
    assert!(format!("{injector:?}").contains("pending"));

    // Fix the registry on a clone, the shared entries become resolved for both
    let mut fixed = injector.clone();
    fixed.value("db", db())?;
    assert_eq!(*fixed.get_as::<String>("app")?.unwrap(), "x");

    assert!(!injector.contains("db"));
    assert_eq!(*injector.get_as::<String>("app")?.unwrap(), "x");
    Ok(())
}

#[test]
fn failing_factories_can_be_retried() -> Result<(), InjectorError> {
    let ready = Arc::new(AtomicBool::new(false));
    let flag = ready.clone();

    let mut injector = Injector::new();
    injector.service_with(
        "conn",
        Vec::<String>::new(),
        Fallible(move || {
            if flag.load(Ordering::SeqCst) {
                Ok(42_u64)
            } else {
                Err("not ready")
            }
        }),
    )?;

    match injector.get("conn") {
        Err(ResolveError::FactoryFailed { service, error }) => {
            assert_eq!(service, "conn");
            assert_eq!(error.to_string(), "not ready");
        }
        other => panic!("expected a factory failure, got {other:?}"),
    }

    ready.store(true, Ordering::SeqCst);
    assert_eq!(*injector.get_as::<u64>("conn")?.unwrap(), 42);
    Ok(())
}

#[test]
fn type_mismatches_are_reported() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("db", "not a db".to_string())?
        .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?;

    assert!(matches!(
        injector.get("repo"),
        Err(ResolveError::ArgumentType { service, dependency, actual_type, .. })
            if service == "repo" && dependency == "db" && actual_type.contains("String")
    ));

    assert!(matches!(
        injector.get_as::<u8>("db"),
        Err(ResolveError::Downcast { name, .. }) if name == "db"
    ));
    Ok(())
}

#[test]
fn clones_share_existing_entries_only() -> Result<(), InjectorError> {
    let mut original = Injector::new();
    original
        .value("db", db())?
        .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?
        .service_with("late", ["db"], |db: Arc<Db>| db.host.len())?;

    let before = original.get_as::<Repo>("repo")?.unwrap();

    let mut clone = original.clone();
    clone.value("extra", 1_u8)?;
    original.value("other", 2_u8)?;

    assert!(!original.contains("extra"));
    assert!(!clone.contains("other"));

    // Resolved before cloning
    let through_clone = clone.get_as::<Repo>("repo")?.unwrap();
    assert!(Arc::ptr_eq(&before, &through_clone));

    // Resolved after cloning, through the clone
    let late = clone.get("late")?.unwrap();
    assert!(late.ptr_eq(&original.get("late")?.unwrap()));
    Ok(())
}

#[test]
fn argument_names_and_values() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector.value("host", "localhost".to_string())?;

    let connect = Signature::new(
        "function (host /* name */, port)",
        |host: Arc<String>, port: Arc<u16>| format!("{host}:{port}"),
    );
    assert_eq!(injector.get_function_arg_names(&connect)?, vec!["host", "port"]);

    let values = injector.get_function_arg_values(&connect)?;
    assert_eq!(values.len(), 2);
    assert_eq!(*values[0].as_ref().unwrap().downcast::<String>().unwrap(), "localhost");
    assert!(values[1].is_none());

    let nothing = crate::signature!(|| 0_u8);
    assert!(injector.get_function_arg_names(&nothing)?.is_empty());
    Ok(())
}

#[test]
fn debug_lists_resolution_state() -> Result<(), InjectorError> {
    let mut injector = Injector::new();
    injector
        .value("db", db())?
        .service_with("repo", ["db"], |db: Arc<Db>| Repo { db })?;

    assert_eq!(
        format!("{injector:?}"),
        r#"Injector { db: "resolved", repo: "pending" }"#
    );
    injector.get("repo")?;
    assert_eq!(
        format!("{injector:?}"),
        r#"Injector { db: "resolved", repo: "resolved" }"#
    );
    assert_eq!(injector.names().collect::<Vec<_>>(), vec!["db", "repo"]);
    Ok(())
}
