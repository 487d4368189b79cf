// Validator names must be given as a string

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Signup {
    #[validate(required)]
    pub email: String,
}

fn main() {}
