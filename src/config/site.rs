use serde::Serialize;

/// The console's fixed settings table. Values are baked in at build time and
/// never reloaded.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct SiteConfig {
    pub name: &'static str,
    pub disable_external: bool,
    pub base_url: &'static str,
    pub api_server: &'static str,
    pub static_url: &'static str,
    pub recaptcha: &'static str,
    pub recaptcha_key: &'static str,
    pub signup: bool,
    pub version: f64,
    pub logo_url: &'static str,
    pub no_auth: bool,
    pub auth_method: &'static str,
    pub login_page: &'static str,
    pub theme: &'static str,
    /// Cookie name the backend uses for the session token.
    pub token_name: &'static str,
}

pub const SITE: SiteConfig = SiteConfig {
    name: "EShop",
    disable_external: false,
    base_url: "/mgt",
    api_server: "http://127.0.0.1:8088",
    static_url: "/",
    recaptcha: "",
    recaptcha_key: "",
    signup: false,
    version: 0.5,
    logo_url: "/admin/pages/img/logo.svg",
    no_auth: false,
    auth_method: "",
    login_page: "/login",
    theme: "dark",
    token_name: "lqcms_token",
};
