// The name-value form also takes a string

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Signup {
    #[validate = 5]
    pub email: String,
}

fn main() {}
