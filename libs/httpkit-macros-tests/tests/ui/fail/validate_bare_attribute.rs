// A tag must name at least the validator list

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Signup {
    #[validate]
    pub email: String,
}

fn main() {}
