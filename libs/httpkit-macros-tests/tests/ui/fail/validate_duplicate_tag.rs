// One tag per field; list several validators inside it instead

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Signup {
    #[validate("required")]
    #[validate("email")]
    pub email: String,
}

fn main() {}
