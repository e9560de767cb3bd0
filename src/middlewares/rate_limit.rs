/*!
 * 速率限制中间件
 *
 * 限制 AI 评测、测评生成、文本提取与文件上传等高开销端点的请求频率。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::rate_limit::RateLimit;
 *
 * App::new()
 *     .service(
 *         web::scope("/api/v1/assessments")
 *             .wrap(RateLimit::ai_generation())
 *             .route("/generate", web::post().to(generate_handler))
 *     )
 * ```
 *
 * ## 限制规则
 *
 * - 以客户端 IP 作为限制键，按前缀区分端点
 * - 超过限制返回 429 Too Many Requests
 * - 正常响应附带 X-RateLimit-Limit / X-RateLimit-Remaining 头
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 全局速率限制缓存
/// 键: 前缀:ip，值: 请求计数
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60)) // 1分钟过期
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒），用于 Retry-After
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// AI 评测：10次/分钟/IP
    pub fn ai_evaluation() -> Self {
        Self::new(10, 60).with_prefix("evaluate")
    }

    /// 测评生成：5次/分钟/IP
    pub fn ai_generation() -> Self {
        Self::new(5, 60).with_prefix("generate")
    }

    /// 文本提取：20次/分钟/IP
    pub fn extraction() -> Self {
        Self::new(20, 60).with_prefix("extract")
    }

    /// 文件上传：10次/分钟/IP
    pub fn file_upload() -> Self {
        Self::new(10, 60).with_prefix("upload")
    }

    fn cache_key(&self, client_ip: &str) -> String {
        if self.key_prefix.is_empty() {
            format!("ip:{client_ip}")
        } else {
            format!("{}:ip:{}", self.key_prefix, client_ip)
        }
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理之后时，需要由代理设置正确的 X-Forwarded-For / X-Real-IP 头。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let cache_key = limit.cache_key(&extract_client_ip(&req));

            let current_count = RATE_LIMIT_CACHE.get(&cache_key).await.unwrap_or(0);

            if current_count >= limit.max_requests {
                warn!(
                    "Rate limit exceeded for key: {} (count: {}/{})",
                    cache_key, current_count, limit.max_requests
                );
                return Ok(req.into_response(
                    create_rate_limit_response(limit.window_secs).map_into_right_body(),
                ));
            }

            RATE_LIMIT_CACHE
                .insert(cache_key, current_count + 1)
                .await;

            let remaining = limit.max_requests.saturating_sub(current_count + 1);
            let mut res = srv.call(req).await?.map_into_left_body();

            let headers = res.headers_mut();
            headers.insert(
                HeaderName::from_static("x-ratelimit-limit"),
                HeaderValue::from(limit.max_requests),
            );
            headers.insert(
                HeaderName::from_static("x-ratelimit-remaining"),
                HeaderValue::from(remaining),
            );
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    #[test]
    fn test_rate_limit_presets() {
        let evaluate = RateLimit::ai_evaluation();
        assert_eq!(evaluate.max_requests, 10);
        assert_eq!(evaluate.window_secs, 60);
        assert_eq!(evaluate.key_prefix, "evaluate");

        let generate = RateLimit::ai_generation();
        assert_eq!(generate.max_requests, 5);

        let upload = RateLimit::file_upload();
        assert_eq!(upload.max_requests, 10);
    }

    #[test]
    fn test_cache_key_includes_prefix() {
        assert_eq!(
            RateLimit::extraction().cache_key("10.0.0.1"),
            "extract:ip:10.0.0.1"
        );
        assert_eq!(RateLimit::new(1, 60).cache_key("::1"), "ip:::1");
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(2, 60).with_prefix("test-over-limit"))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        for expected_remaining in ["1", "0"] {
            let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(
                resp.headers().get("x-ratelimit-remaining").unwrap(),
                expected_remaining
            );
        }

        let resp = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get("Retry-After").unwrap(), "60");
    }
}
