//! User Model

use serde::{Deserialize, Serialize};

use super::{FormError, length_between};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::User => "Usuário",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity (`Usuario`), never carries the password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id_user: String,
    pub nome: String,
    pub username: String,
    pub roles: Role,
    #[serde(default)]
    pub created_at: String,
}

impl User {
    /// Username equality as the backend enforces it (case-insensitive)
    pub fn has_username(&self, username: &str) -> bool {
        self.username.to_lowercase() == username.trim().to_lowercase()
    }
}

/// Registration payload (`UsuarioRequest`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub nome: String,
    pub username: String,
    pub password: String,
    pub roles: Role,
}

impl UserForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if !length_between(&self.nome, 2, 50) {
            return Err(FormError::new("nome", "Nome deve ter entre 2 e 50 caracteres"));
        }
        let username_len = self.username.chars().count();
        if !(3..=20).contains(&username_len) {
            return Err(FormError::new(
                "username",
                "Username deve ter entre 3 e 20 caracteres",
            ));
        }
        if self.password.chars().count() < 6 {
            return Err(FormError::new(
                "password",
                "Senha deve ter pelo menos 6 caracteres",
            ));
        }
        Ok(())
    }
}

/// Partial update payload; empty fields are left out of the request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "is_blank")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Role>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Client-side user search (`searchUsuarios`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    pub nome: Option<String>,
    pub username: Option<String>,
    pub roles: Option<Role>,
}

impl UserSearch {
    pub fn matches(&self, user: &User) -> bool {
        let contains = |haystack: &str, needle: &Option<String>| match needle {
            Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
            _ => true,
        };

        contains(&user.nome, &self.nome)
            && contains(&user.username, &self.username)
            && self.roles.is_none_or(|r| r == user.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, nome: &str, username: &str, roles: Role) -> User {
        User {
            id_user: id.to_string(),
            nome: nome.to_string(),
            username: username.to_string(),
            roles,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_update_skips_empty_fields() {
        let update = UserUpdate {
            nome: Some("Maria".to_string()),
            username: Some(String::new()),
            password: None,
            roles: Some(Role::Admin),
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "nome": "Maria", "roles": "ADMIN" }));
    }

    #[test]
    fn test_user_decodes_without_password() {
        let json = r#"{"idUser":"7","nome":"Ana","username":"ana","roles":"USER","createdAt":"2024-01-01"}"#;
        let u: User = serde_json::from_str(json).unwrap();
        assert_eq!(u.id_user, "7");
        assert_eq!(u.roles, Role::User);
    }

    #[test]
    fn test_form_validation() {
        let mut form = UserForm {
            nome: "Ana Paula".to_string(),
            username: "anapaula".to_string(),
            password: "segredo".to_string(),
            roles: Role::User,
        };
        assert!(form.validate().is_ok());

        form.username = "ab".to_string();
        assert_eq!(form.validate().unwrap_err().field, "username");

        form.username = "anapaula".to_string();
        form.password = "123".to_string();
        assert_eq!(form.validate().unwrap_err().field, "password");
    }

    #[test]
    fn test_search_filters() {
        let users = [
            user("1", "Ana Paula", "ana", Role::Admin),
            user("2", "Bruno", "bruno", Role::User),
        ];

        let search = UserSearch {
            nome: Some("PAULA".to_string()),
            ..Default::default()
        };
        assert!(search.matches(&users[0]));
        assert!(!search.matches(&users[1]));

        let search = UserSearch {
            roles: Some(Role::User),
            ..Default::default()
        };
        assert!(!search.matches(&users[0]));
        assert!(search.matches(&users[1]));
    }

    #[test]
    fn test_has_username_ignores_case() {
        let u = user("1", "Ana", "AnaP", Role::User);
        assert!(u.has_username("anap"));
        assert!(!u.has_username("ana"));
    }
}
