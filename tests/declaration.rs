//! End-to-end declaration, invocation and catalog scenarios.

use business_errors::{
    Config, Error, ErrorDef, ErrorValue, Group, Holder, Message, Payload, catalog, config,
    current_locale, define_errors, set_locale,
};
use serde_json::json;
use std::sync::Once;

static CONFIG: Once = Once::new();

/// Tests in this binary share one process-wide config.
fn setup() {
    CONFIG.call_once(|| {
        let config = Config::from_json(
            r#"{
                "default_http_status": 400,
                "formats": {
                    "short": ["c", "m"],
                    "api": ["code", "message", "status"]
                }
            }"#,
        )
        .unwrap();
        config::install(config);
    });
}

fn business(result: business_errors::Result<()>) -> ErrorValue {
    match result {
        Err(Error::Business(value)) => *value,
        other => panic!("expected a business signal, got {other:?}"),
    }
}

#[test]
fn invalid_token_end_to_end() {
    setup();
    let auth = Holder::define("DeclAuth", |d| {
        d.code_start_at(100).http(401);
        d.define("invalid_token")?;
        Ok(())
    })
    .unwrap();

    let value = auth.get_in("invalid_token", "en").unwrap();
    assert_eq!(value.code(), 100);
    assert_eq!(value.http_status(), 401);
    assert_eq!(value.message(), "Invalid token");
    assert_eq!(value.info().to_json(), json!({"code": 100, "msg": "Invalid token", "http": 401}));

    let raised = business(auth.raise("invalid_token"));
    assert!(raised.is_signaled());
    assert_eq!(Error::Business(Box::new(raised)).http_status(), 401);
}

#[test]
fn unseeded_declaration_is_rejected() {
    setup();
    let err = Holder::define("DeclUnseeded", |d| {
        d.group("auth", |g| {
            g.define("invalid_token")?;
            Ok(())
        })
    })
    .unwrap_err();

    assert!(matches!(
        err,
        Error::MissingCodeSeed { ref group, ref name, .. } if group == "auth" && name == "invalid_token"
    ));
    assert!(catalog::lookup_tree("DeclUnseeded").is_none());
}

#[test]
fn config_default_status_applies() {
    setup();
    let holder = Holder::define("DeclDefaults", |d| {
        d.code_start_at(1);
        d.define("plain")?;
        Ok(())
    })
    .unwrap();

    assert_eq!(holder.spec("plain").unwrap().http_status(), 400);
}

#[test]
fn nested_groups_restore_outer_scope() {
    setup();
    let holder = Holder::define("DeclNested", |d| {
        d.code_start_at(1000).http(422);
        d.define("a")?;
        d.group(Group::new("payment").code_start_at(-1).http(402), |g| {
            g.define("b")?;
            g.group(Group::new("card").code_start_at(-500), |c| {
                c.define("c")?;
                Ok(())
            })?;
            g.define("d")?;
            Ok(())
        })?;
        d.define("e")?;
        Ok(())
    })
    .unwrap();

    let summary: Vec<_> = holder
        .specs()
        .map(|spec| (spec.name().to_owned(), spec.code(), spec.http_status(), spec.group().to_owned()))
        .collect();
    assert_eq!(
        summary,
        [
            ("a".to_owned(), 1000, 422, "public".to_owned()),
            ("b".to_owned(), -1, 402, "payment".to_owned()),
            ("c".to_owned(), -500, 402, "card".to_owned()),
            ("d".to_owned(), -2, 402, "payment".to_owned()),
            ("e".to_owned(), 1001, 422, "public".to_owned()),
        ]
    );
}

#[test]
fn derived_holder_isolation() {
    setup();
    let parent = Holder::define("DeclParent", |d| {
        d.code_start_at(1).http(401);
        d.define("auth_invalid_token")?;
        d.define("forbidden")?;
        Ok(())
    })
    .unwrap();
    let child = parent
        .derive("DeclChild", |d| {
            d.code_start_at(500);
            d.import(&parent, "forbidden")?;
            d.define("own")?;
            Ok(())
        })
        .unwrap();

    let err = child.raise::<()>("auth_invalid_token").unwrap_err();
    assert!(matches!(err, Error::NotSupported { .. }));
    assert!(err.to_string().contains("DeclParent"));

    assert_eq!(child.get_in("forbidden", "en").unwrap().code(), 2);
    assert_eq!(child.get_in("own", "en").unwrap().code(), 500);
    assert_eq!(parent.get_in("auth_invalid_token", "en").unwrap().code(), 1);

    let tree = child.lookup_tree().unwrap();
    let names: Vec<_> = tree["public"].iter().map(|spec| spec.name()).collect();
    assert_eq!(names, ["forbidden", "own"]);
}

#[test]
fn localized_messages_follow_current_locale() {
    setup();
    let holder = Holder::define("DeclI18n", |d| {
        d.code_start_at(1);
        d.define(ErrorDef::new("not_found").message(Message::localized([
            ("en", "Not found"),
            ("fr", "Introuvable"),
        ])))?;
        d.define(ErrorDef::new("gone").message(Message::localized([("fr", "Parti")])))?;
        Ok(())
    })
    .unwrap();

    assert_eq!(current_locale(), "en");
    assert_eq!(holder.get("not_found").unwrap().message(), "Not found");

    set_locale("fr");
    assert_eq!(holder.get("not_found").unwrap().message(), "Introuvable");
    assert_eq!(holder.get_in("not_found", "de").unwrap().message(), "Not found");
    assert_eq!(holder.get_in("gone", "de").unwrap().message(), "Gone");
}

#[test]
fn prefix_groups() {
    setup();
    let holder = Holder::define("DeclPrefix", |d| {
        d.code_start_at(200).http(401);
        d.define_px("auth_invalid_token")?;
        d.define_px("auth_expired")?;
        d.define_px("session_gone")?;
        Ok(())
    })
    .unwrap();

    let tree = holder.lookup_tree().unwrap();
    assert_eq!(tree.keys().collect::<Vec<_>>(), ["auth", "session"]);
    assert_eq!(holder.spec("session_gone").unwrap().code(), 202);
    assert_eq!(holder.spec("auth_expired").unwrap().http_status(), 401);
}

#[test]
fn render_and_with() {
    setup();
    let holder = Holder::define("DeclRender", |d| {
        d.code_start_at(7).http(409);
        d.define(ErrorDef::new("conflict").message("Already exists"))?;
        d.group(Group::new("api").format("api"), |g| {
            g.define(ErrorDef::new("api_conflict").message("Conflict"))?;
            Ok(())
        })
    })
    .unwrap();

    let value = holder.get_in("conflict", "en").unwrap();
    let rendered = business(value.render("short", Payload::new().with("id", 3)));
    assert_eq!(rendered.info().to_json(), json!({"only": {"c": 7, "m": "Already exists", "id": 3}}));

    let value = holder.get_in("conflict", "en").unwrap();
    let attached = business(value.with(Payload::new().with("field", "email")));
    assert_eq!(
        attached.info().to_json(),
        json!({"code": 7, "msg": "Already exists", "http": 409, "data": {"field": "email"}})
    );

    let thrown = business(holder.raise_in("api_conflict", "en"));
    assert_eq!(
        thrown.info().to_json(),
        json!({"only": {"code": 8, "message": "Conflict", "status": 409}})
    );

    let value = holder.get_in("conflict", "en").unwrap();
    assert!(matches!(
        value.render::<()>("missing", Payload::new()),
        Err(Error::UnknownFormat { .. })
    ));
}

#[test]
fn macro_declarations() {
    setup();
    let holder = Holder::define("DeclMacro", |d| {
        d.code_start_at(-10).http(402);
        define_errors!(d => {
            card_declined,
            card_expired = "Card expired",
        });
        Ok(())
    })
    .unwrap();

    assert_eq!(holder.spec("card_expired").unwrap().code(), -11);
    assert_eq!(holder.get_in("card_declined", "en").unwrap().message(), "Card declined");
}

#[test]
fn holder_dump() {
    setup();
    let holder = Holder::define("DeclDump", |d| {
        d.code_start_at(100).http(401);
        d.group("auth", |g| {
            g.define("invalid_token")?;
            g.define(ErrorDef::new("token_expired").message("yes"))?;
            Ok(())
        })
    })
    .unwrap();

    assert_eq!(
        holder.dump().unwrap(),
        "---\nauth:\n\
         - name: invalid_token\n  msg: Invalid token\n  code: 100\n  http: 401\n\
         - name: token_expired\n  msg: \"yes\"\n  code: 101\n  http: 401\n"
    );

    let everything = catalog::dump_all().unwrap();
    assert!(everything.contains("DeclDump:\n  auth:\n  - name: invalid_token\n"));
}

#[test]
fn concurrent_invocations() {
    setup();
    let holder = Holder::define("DeclConcurrent", |d| {
        d.code_start_at(1).http(503);
        d.define("unavailable")?;
        Ok(())
    })
    .unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let holder = &holder;
                scope.spawn(move || {
                    let value = business(
                        holder
                            .get_in("unavailable", "en")
                            .unwrap()
                            .with(Payload::new().with("worker", i)),
                    );
                    assert_eq!(value.info().get("data"), Some(&json!({"worker": i})));
                    value.code()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    });

    assert!(catalog::global().lookup_tree("DeclConcurrent").is_some());
}

#[cfg(feature = "tokio")]
#[tokio::test]
async fn task_scoped_locale() {
    use business_errors::locale::scope_locale;

    setup();
    let holder = Holder::define("DeclTaskLocale", |d| {
        d.code_start_at(1);
        d.define(ErrorDef::new("busy").message(Message::localized([("en", "Busy"), ("de", "Beschäftigt")])))?;
        Ok(())
    })
    .unwrap();

    let message = scope_locale("de", async { holder.get("busy").unwrap().message().to_owned() }).await;
    assert_eq!(message, "Beschäftigt");
    assert_eq!(holder.get("busy").unwrap().message(), "Busy");
}
