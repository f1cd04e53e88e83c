use business_errors::{Config, Error, ErrorDef, Group, Holder, Payload, config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::install(Config::from_json(
        r#"{
            "default_http_status": 400,
            "formats": {
                "short": ["c", "m"],
                "api": ["code", "message", "status"]
            }
        }"#,
    )?);

    let users = Holder::define("Users", |d| {
        d.code_start_at(300);
        d.define("email_taken")?;
        d.group(Group::new("v2").format("api"), |g| {
            g.define(ErrorDef::new("name_invalid").message("Name must not be empty"))?;
            Ok(())
        })
    })?;

    let outcomes = [
        users.get("email_taken")?.throw::<()>(),
        users.get("email_taken")?.render("short", Payload::new().with("field", "email")),
        users.get("email_taken")?.with(Payload::new().with("email", "a@example.com")),
        users.raise("name_invalid"),
    ];

    for outcome in outcomes {
        if let Err(Error::Business(value)) = outcome {
            println!("{:<12} HTTP {} {}", value.name(), value.http_status(), value.info());
        }
    }

    Ok(())
}
