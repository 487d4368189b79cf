// A plain struct with renamed and nested fields derives and validates

use std::sync::Arc;

use httpkit_validate::{Validate, ValidationConfig, ValidationEngine, ValidatorTable};
use serde::Deserialize;

#[derive(Validate, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate("required")]
    pub postal_code: String,
}

#[derive(Validate, Deserialize)]
pub struct Signup {
    #[validate("required,email")]
    #[serde(rename = "emailAddress")]
    pub email: String,
    #[validate = "struct"]
    pub address: Option<Address>,
    pub note: String,
}

fn main() {
    let schema = Signup::schema();
    assert_eq!(schema.fields().len(), 2);
    assert_eq!(schema.fields()[0].display_name(), "emailAddress");

    let engine =
        ValidationEngine::new(ValidatorTable::new(), Arc::new(ValidationConfig::default()));
    let signup = Signup {
        email: String::new(),
        address: Some(Address {
            postal_code: String::new(),
        }),
        note: String::new(),
    };
    // Nothing is registered in the table, so every name is undefined
    assert_eq!(engine.validate(&signup).len(), 3);
}
