//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use shared::client::UserInfo;
use shared::models::{Permission, Role};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match load_jwt_secret() {
            Ok(secret) => secret,
            Err(e) => {
                tracing::warn!("JWT configuration error: {}, using a random key", e);
                generate_printable_jwt_secret()
            }
        };

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720), // 默认 12 小时 (一个营业日)
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "orema-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "orema-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 员工 ID (Subject)
    pub sub: String,
    pub username: String,
    pub display_name: String,
    /// 角色 (SUPER_ADMIN, ADMIN, ...)
    pub role: String,
    pub establishment_id: i64,
    /// 有效权限 (逗号分隔)，登录时解析自角色默认值或门店覆盖
    pub permissions: String,
    /// 路由白名单 (None = 按角色规则)
    #[serde(default)]
    pub allowed_routes: Option<Vec<String>>,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

/// 生成可打印的随机 JWT 密钥 (开发环境 / 未配置时)
pub fn generate_printable_jwt_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_=+.";

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    if rng.fill(&mut bytes).is_err() {
        // ring 取随机数失败时退回 rand
        use rand::Rng;
        rand::thread_rng().fill(&mut bytes[..]);
    }
    bytes
        .iter()
        .map(|b| ALLOWED[(*b as usize) % ALLOWED.len()] as char)
        .collect()
}

/// 从环境变量加载 JWT 密钥
fn load_jwt_secret() -> Result<String, JwtError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| JwtError::ConfigError("JWT_SECRET is not set".to_string()))?;
    if secret.len() < 32 {
        return Err(JwtError::ConfigError(
            "JWT_SECRET must be at least 32 characters long".to_string(),
        ));
    }
    Ok(secret)
}

/// JWT 令牌服务
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(&self, user: &CurrentUser) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let permissions = user
            .permissions
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            establishment_id: user.establishment_id,
            permissions,
            allowed_routes: user.allowed_routes.clone(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求扩展。`permissions` 是登录时解析的
/// 有效权限集合，门店覆盖修改后需重新登录才会生效。
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub establishment_id: i64,
    pub permissions: Vec<Permission>,
    pub allowed_routes: Option<Vec<String>>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("invalid subject: {}", claims.sub))?;
        let role = claims.role.parse::<Role>().map_err(|e| e.to_string())?;
        let permissions = claims
            .permissions
            .split(',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Permission>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            username: claims.username,
            display_name: claims.display_name,
            role,
            establishment_id: claims.establishment_id,
            permissions,
            allowed_routes: claims.allowed_routes,
        })
    }
}

impl CurrentUser {
    /// 是否管理员 (SUPER_ADMIN / ADMIN)
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// 检查是否拥有指定权限
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    /// 检查是否拥有任一指定权限
    pub fn has_any_permission(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(*p))
    }

    /// 检查是否拥有所有指定权限
    pub fn has_all_permissions(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(*p))
    }

    pub fn to_user_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
            establishment_id: self.establishment_id,
            permissions: self.permissions.clone(),
            allowed_routes: self.allowed_routes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "unit-test-secret-key-0123456789abcdef".to_string(),
            expiration_minutes: 30,
            issuer: "orema-server".to_string(),
            audience: "orema-clients".to_string(),
        })
    }

    fn serveur() -> CurrentUser {
        CurrentUser {
            id: 42,
            username: "lea".to_string(),
            display_name: "Léa".to_string(),
            role: Role::Serveur,
            establishment_id: 1,
            permissions: vec![Permission::TableVoir, Permission::VenteCreer],
            allowed_routes: Some(vec!["/tables".to_string()]),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service();
        let token = service.generate_token(&serveur()).expect("token");

        let claims = service.validate_token(&token).expect("claims");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "SERVEUR");
        assert_eq!(claims.permissions, "table:voir,vente:creer");

        let user = CurrentUser::try_from(claims).expect("user");
        assert_eq!(user, serveur());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = service().generate_token(&serveur()).unwrap();
        let other = JwtService::with_config(JwtConfig {
            secret: "another-secret-key-0123456789abcdefgh".to_string(),
            ..service().config
        });
        assert!(matches!(
            other.validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token() {
        let mut config = service().config;
        config.expiration_minutes = -10;
        let expired = JwtService::with_config(config);
        let token = expired.generate_token(&serveur()).unwrap();
        assert!(matches!(
            expired.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_permission_checks() {
        let user = serveur();
        assert!(user.has_permission(Permission::TableVoir));
        assert!(!user.has_permission(Permission::TableModifier));
        assert!(user.has_any_permission(&[Permission::TableModifier, Permission::VenteCreer]));
        assert!(!user.has_all_permissions(&[Permission::TableVoir, Permission::TableModifier]));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_printable_jwt_secret();
        let b = generate_printable_jwt_secret();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
    }
}
