//! Signup Validation Demo
//!
//! Validates a signup form twice: once as a native struct and once decoded
//! from a JSON request body. Run with `RUST_LOG=fieldcheck=trace` to see each
//! rule as it runs, and `FIELDCHECK_LOG_JSON=1` for JSON log lines.

use fieldcheck::{check, Reason, Record, Validator, ValidatorConfig};
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Record, Debug, Default)]
struct Address {
    #[is("required")]
    city: String,
    #[is("required,len==5")]
    zip: String,
}

#[derive(Record, Debug, Default)]
struct Signup {
    #[is("required,lower,len>=3", rename = "username")]
    user_name: String,
    #[is("required,email")]
    email: String,
    #[is("len>=8")]
    password: String,
    #[is("nonzero,adult")]
    age: u8,
    #[is(nested)]
    address: Address,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var("FIELDCHECK_LOG_JSON").is_ok() {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new())
            .init();
    }
}

fn main() {
    init_logging();

    let config = ValidatorConfig::from_env().unwrap_or_else(|err| {
        tracing::warn!("Ignoring environment configuration: {}", err);
        ValidatorConfig::default()
    });

    let validator = Validator::builder()
        .config(config)
        .rule(
            "adult",
            check(|value, _| match value.as_u64() {
                Some(age) if age >= 18 => Ok(()),
                _ => Err(Reason::custom("must be at least 18")),
            }),
        )
        .build();

    println!("📝 Signup Validation Demo");
    println!("Registered rules: {:?}", validator.registry().rule_names());

    // Native struct validation
    let mut signup = Signup {
        user_name: "MatRyer".to_string(),
        email: "mat@example".to_string(),
        password: "hunter2".to_string(),
        age: 16,
        address: Address {
            city: "London".to_string(),
            zip: "N1".to_string(),
        },
    };

    match validator.validate(&mut signup) {
        Ok(problems) => {
            println!("\n🔍 Struct validation");
            println!("   username after rules: {}", signup.user_name);
            println!("{}", problems);
        }
        Err(err) => eprintln!("Validation could not run: {}", err),
    }

    // Decoding a request body
    let body = r#"{
        "username": "Ann_Lee",
        "email": "ann@example.com",
        "password": "correct horse battery",
        "age": 34,
        "address": {"city": "Leeds", "zip": "LS1AA"}
    }"#;

    let mut decoded = Signup::default();
    match validator.decode_json(body, &mut decoded) {
        Ok(problems) if problems.is_empty() => {
            println!("\n✅ Decoded request body");
            println!("   {:?}", decoded);
        }
        Ok(problems) => {
            println!("\n❌ Request body rejected");
            println!("{}", problems.to_json());
        }
        Err(err) => eprintln!("Could not decode request body: {}", err),
    }
}
