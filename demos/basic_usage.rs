use business_errors::{Error, ErrorDef, Holder, Result};

fn auth_errors() -> Result<Holder> {
    Holder::define("Auth", |d| {
        d.code_start_at(100).http(401);
        d.define("invalid_token")?;
        d.define(ErrorDef::new("token_expired").message("Your session has expired"))?;
        d.define(ErrorDef::new("locked").code(199).http(423))?;
        Ok(())
    })
}

fn authenticate(errors: &Holder, token: &str) -> Result<String> {
    match token {
        "" => errors.raise("invalid_token"),
        "old" => errors.raise("token_expired"),
        "admin" => errors.raise("locked"),
        user => Ok(format!("user:{user}")),
    }
}

fn main() -> Result<()> {
    let errors = auth_errors()?;

    println!("--- Basic Usage Example ---\n");

    for token in ["alice", "", "old", "admin"] {
        match authenticate(&errors, token) {
            Ok(user) => println!("{token:>8} -> authenticated as {user}"),
            // The boundary layer maps the business error onto a response.
            Err(Error::Business(value)) => {
                println!("{token:>8} -> HTTP {} {}", value.http_status(), value.info());
                value.with_signal_log(|log| {
                    let mut line = String::new();
                    if log.write_to(&mut line).is_ok() {
                        println!("{:>8}    log: {line}", "");
                    }
                });
            }
            Err(other) => return Err(other),
        }
    }

    Ok(())
}
