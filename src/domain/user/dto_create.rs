use super::UserRole;

#[derive(Debug, Clone)]
pub struct CreateAccountDto {
    pub id: String,
    pub name: String,
    pub password: String,
    pub role: Option<UserRole>,
}
