use contact_links::{ContactStore, Settings};
use handle_errors::Error as CustomError;
use mongodb::bson::Bson;
use std::env;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

fn parse_arg(value: Option<String>, name: &'static str) -> Result<i64, CustomError> {
    let value = value.ok_or(CustomError::InvalidArgument(name))?;
    value
        .parse::<i64>()
        .map_err(|_| CustomError::UnparsableArgument {
            argument: name,
            value,
        })
}

#[tokio::main]
async fn main() -> Result<(), CustomError> {
    // Loads .env, the optional setup file and CONTACT_STORE_* variables
    let settings = Settings::load()?;

    let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "contact_links={},handle_errors={}",
            settings.log_level, settings.log_level
        )
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter))
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // Usage: contact-links <internal_id> <product_id>
    let mut args = env::args().skip(1);
    let internal_id = parse_arg(args.next(), "internal_id")?;
    let product_id = parse_arg(args.next(), "product_id")?;

    let store = ContactStore::connect(&settings).await?;
    match store.get_contact_by_internal_id(internal_id, product_id).await {
        Ok(contact) => {
            let json = Bson::Document(contact).into_relaxed_extjson();
            println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            eprintln!("{}", e);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_unparsable_arguments_are_told_apart() {
        assert_eq!(parse_arg(Some("42".to_string()), "internal_id").unwrap(), 42);
        assert!(matches!(
            parse_arg(None, "internal_id"),
            Err(CustomError::InvalidArgument("internal_id"))
        ));

        let err = parse_arg(Some("abc".to_string()), "product_id").unwrap_err();
        assert!(matches!(
            &err,
            CustomError::UnparsableArgument { argument: "product_id", value } if value == "abc"
        ));
        assert_eq!(err.to_string(), "Cannot parse product_id from \"abc\"");
        assert_eq!(err.code(), 400);
    }
}
