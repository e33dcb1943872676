//! Domain services
//!
//! One service per backend resource. Each call goes through the shared
//! [`HttpClient`](crate::HttpClient) and turns transport failures into a
//! [`ServiceError`] with the message the dashboard shows.

mod auth;
mod charts;
mod products;
mod sales;
mod users;

pub use auth::{AuthApi, AuthService};
pub use charts::{ChartApi, ChartsService};
pub use products::{ProductApi, ProductsService};
pub use sales::{SaleApi, SalesService};
pub use users::{UserApi, UsersService};

use async_trait::async_trait;

use crate::error::{ClientError, ErrorKind, ServiceError, ServiceResult};
use crate::types::Entity;

pub const NETWORK_MESSAGE: &str = "Erro de conexão com o servidor. Verifique sua internet.";
pub const UNAUTHORIZED_MESSAGE: &str = "Não autorizado. Faça login novamente.";
pub const SERVER_MESSAGE: &str = "Erro interno do servidor. Tente novamente mais tarde.";
pub const USERNAME_TAKEN_MESSAGE: &str = "Username já existe. Escolha outro username.";
const INVALID_DATA_MESSAGE: &str = "Dados inválidos";

/// CRUD over one backend collection
#[async_trait]
pub trait CollectionApi<T: Entity>: Send + Sync {
    async fn list(&self) -> ServiceResult<Vec<T>>;
    async fn get(&self, id: &str) -> ServiceResult<T>;
    async fn create(&self, data: T::Create) -> ServiceResult<T>;
    async fn update(&self, id: &str, data: T::Update) -> ServiceResult<T>;
    async fn delete(&self, id: &str) -> ServiceResult<()>;
}

/// Backend resource, for error wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resource {
    Sales,
    Users,
    Products,
    Charts,
    Auth,
}

impl Resource {
    fn singular(self) -> &'static str {
        match self {
            Resource::Sales => "venda",
            Resource::Users => "usuário",
            Resource::Products => "produto",
            Resource::Charts => "gráfico",
            Resource::Auth => "sessão",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Resource::Sales => "vendas",
            Resource::Users => "usuários",
            Resource::Products => "produtos",
            Resource::Charts => "gráficos",
            Resource::Auth => "sessões",
        }
    }

    fn not_found(self) -> String {
        match self {
            Resource::Sales => "Venda não encontrada".to_string(),
            Resource::Users => "Usuário não encontrado".to_string(),
            Resource::Products => "Produto não encontrado".to_string(),
            other => format!("{} não encontrado", capitalize(other.singular())),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    ByPeriod,
    Chart,
    Login,
    Validate,
}

fn fallback_message(resource: Resource, op: Operation) -> String {
    match op {
        Operation::List => format!("Erro ao carregar {}", resource.plural()),
        Operation::Get => format!("Erro ao buscar {}", resource.singular()),
        Operation::Create => format!("Erro ao criar {}", resource.singular()),
        Operation::Update => format!("Erro ao atualizar {}", resource.singular()),
        Operation::Delete => format!("Erro ao excluir {}", resource.singular()),
        Operation::ByPeriod => format!("Erro ao buscar {} por período", resource.plural()),
        Operation::Chart => "Erro ao carregar dados dos gráficos".to_string(),
        Operation::Login => "Erro ao fazer login".to_string(),
        Operation::Validate => "Erro ao validar token".to_string(),
    }
}

fn status_message(
    status: u16,
    server: Option<&str>,
    resource: Resource,
    op: Operation,
) -> String {
    let or_fallback = |fallback: String| server.map(str::to_string).unwrap_or(fallback);

    match status {
        400 => match (resource, op) {
            (_, Operation::Login) => {
                "Credenciais inválidas. Verifique seu usuário e senha.".to_string()
            }
            (_, Operation::ByPeriod) => "Período inválido. Verifique as datas.".to_string(),
            (Resource::Sales, Operation::Delete) => "Não foi possível excluir a venda.".to_string(),
            _ => or_fallback(INVALID_DATA_MESSAGE.to_string()),
        },
        401 => match op {
            Operation::Login => "Usuário ou senha incorretos.".to_string(),
            Operation::Validate => "Token inválido ou expirado".to_string(),
            _ => UNAUTHORIZED_MESSAGE.to_string(),
        },
        403 => {
            let verb = if op == Operation::Delete {
                "excluir"
            } else {
                "acessar"
            };
            format!(
                "Acesso negado. Você não tem permissão para {} {}.",
                verb,
                resource.plural()
            )
        }
        404 => resource.not_found(),
        409 if resource == Resource::Users => USERNAME_TAKEN_MESSAGE.to_string(),
        500 if op == Operation::Delete && resource != Resource::Sales => format!(
            "Erro interno do servidor. Não foi possível excluir o {}.",
            resource.singular()
        ),
        500..=599 => SERVER_MESSAGE.to_string(),
        _ => or_fallback(fallback_message(resource, op)),
    }
}

/// Map a transport failure to the message shown for `op` on `resource`
pub(crate) fn classify(err: ClientError, resource: Resource, op: Operation) -> ServiceError {
    let service_err = match &err {
        ClientError::Network { .. } => ServiceError::new(ErrorKind::Network, NETWORK_MESSAGE),
        ClientError::Http { status, .. } => ServiceError::new(
            ErrorKind::from_status(*status),
            status_message(*status, err.server_message(), resource, op),
        ),
        ClientError::Decode(_) | ClientError::Setup(_) => {
            ServiceError::new(ErrorKind::Other, fallback_message(resource, op))
        }
    };
    tracing::warn!(
        resource = resource.plural(),
        operation = ?op,
        kind = ?service_err.kind,
        error = %err,
        "Request failed"
    );
    service_err
}

/// Reject ids that would produce a malformed path
pub(crate) fn require_id(id: &str, resource: Resource) -> ServiceResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ServiceError::new(
            ErrorKind::Validation,
            format!("ID do {} é obrigatório", resource.singular()),
        ));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: Option<&str>) -> ClientError {
        ClientError::Http {
            status,
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_network_errors_share_one_message() {
        let err = classify(
            ClientError::Network {
                message: "connection refused".into(),
                timeout: false,
            },
            Resource::Sales,
            Operation::List,
        );
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.message, NETWORK_MESSAGE);
    }

    #[test]
    fn test_status_table() {
        let err = classify(http(401, None), Resource::Users, Operation::List);
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(err.message, UNAUTHORIZED_MESSAGE);

        let err = classify(http(403, None), Resource::Sales, Operation::Delete);
        assert_eq!(
            err.message,
            "Acesso negado. Você não tem permissão para excluir vendas."
        );

        let err = classify(http(409, None), Resource::Users, Operation::Create);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, USERNAME_TAKEN_MESSAGE);

        let err = classify(http(404, None), Resource::Products, Operation::Update);
        assert_eq!(err.message, "Produto não encontrado");

        let err = classify(http(500, None), Resource::Users, Operation::Delete);
        assert_eq!(
            err.message,
            "Erro interno do servidor. Não foi possível excluir o usuário."
        );

        let err = classify(http(502, None), Resource::Sales, Operation::List);
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, SERVER_MESSAGE);
    }

    #[test]
    fn test_validation_prefers_server_message() {
        let err = classify(
            http(400, Some("Quantidade inválida")),
            Resource::Sales,
            Operation::Create,
        );
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Quantidade inválida");

        let err = classify(http(400, None), Resource::Sales, Operation::Create);
        assert_eq!(err.message, "Dados inválidos");

        let err = classify(http(400, Some("x")), Resource::Sales, Operation::Delete);
        assert_eq!(err.message, "Não foi possível excluir a venda.");
    }

    #[test]
    fn test_login_wording() {
        let err = classify(http(401, None), Resource::Auth, Operation::Login);
        assert_eq!(err.message, "Usuário ou senha incorretos.");
        let err = classify(http(400, None), Resource::Auth, Operation::Login);
        assert_eq!(
            err.message,
            "Credenciais inválidas. Verifique seu usuário e senha."
        );
    }

    #[test]
    fn test_unmapped_status_falls_back() {
        let err = classify(http(418, None), Resource::Sales, Operation::List);
        assert_eq!(err.kind, ErrorKind::Other);
        assert_eq!(err.message, "Erro ao carregar vendas");

        let err = classify(http(418, Some("teapot")), Resource::Products, Operation::Get);
        assert_eq!(err.message, "teapot");
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id(" 42 ", Resource::Sales).unwrap(), "42");
        assert_eq!(
            require_id("", Resource::Users).unwrap_err().kind,
            ErrorKind::Validation
        );
    }
}
