// Borrowing structs are not 'static and cannot be type-erased

use httpkit_validate::Validate;

#[derive(Validate)]
pub struct Borrowed<'a> {
    #[validate("required")]
    pub name: &'a str,
}

fn main() {}
