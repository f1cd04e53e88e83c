use business_errors::{ErrorDef, Group, Holder, Message, Result, catalog, set_locale};

fn main() -> Result<()> {
    let orders = Holder::define("Orders", |d| {
        d.code_start_at(1000).http(422);
        d.define("out_of_stock")?;

        d.group(Group::new("payment").code_start_at(-1).http(402), |g| {
            g.define("card_declined")?;
            g.define(ErrorDef::new("card_expired").message(Message::localized([
                ("en", "Card expired"),
                ("fr", "Carte expirée"),
            ])))?;
            Ok(())
        })?;

        // Group by prefix: lands in `shipping`, numbered from the outer cursor.
        d.define_px("shipping_address_invalid")?;
        d.define("quantity_invalid")?;
        Ok(())
    })?;

    let marketplace = orders.derive("Marketplace", |d| {
        d.code_start_at(5000).http(409);
        d.import(&orders, "out_of_stock")?;
        d.define("seller_suspended")?;
        Ok(())
    })?;

    if let Some(dump) = catalog::dump_all() {
        print!("{dump}");
    }

    set_locale("fr");
    println!("\nfr: {}", orders.get("card_expired")?.message());

    match marketplace.get("card_declined") {
        Ok(value) => println!("unexpected: {value}"),
        Err(err) => println!("derived holder: {err}"),
    }

    Ok(())
}
