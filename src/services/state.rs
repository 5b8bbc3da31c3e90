//! # 应用全局状态
//!
//! 通过 Tauri 的 `manage()` 注册，所有 command 通过 `State<AppState>` 访问。
//!
//! ## 组成
//! - `Account`：额度存储、会话存储、升级状态机、白标配置、当前策略结果，
//!   整体放在一把 `tokio::sync::Mutex` 之后，保证单写者
//! - `StrategyClient`：无状态的策略请求客户端
//! - `generating`：生成进行中标志，拒绝重复的并发生成（等价于前端禁用提交按钮）
//!
//! ## 锁纪律
//! 网络请求和升级延时期间都不持有账户锁。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::account::{Entitlement, Session};
use crate::models::branding::BrandingConfig;
use crate::models::settings::AppSettings;
use crate::models::strategy::StrategyResult;
use crate::services::audit::{self, AuditRow};
use crate::services::branding;
use crate::services::entitlement::EntitlementStore;
use crate::services::export;
use crate::services::gemini::GeminiBackend;
use crate::services::session::{self, IdentityClassifier, SessionStore, SubstringClassifier};
use crate::services::store::{FileStore, MemoryStore, RecordStore};
use crate::services::strategy_client::{GenerationError, StrategyClient};
use crate::services::upgrade::{self, UpgradeFlow, UpgradeState};

/// 应用层错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Seus créditos gratuitos acabaram. Faça upgrade para o plano Pro para continuar.")]
    CreditsExhausted,

    #[error("Já existe uma análise em andamento. Aguarde a conclusão.")]
    GenerationInProgress,

    #[error("Digite uma palavra-chave para analisar.")]
    EmptyKeyword,

    #[error("Nenhuma estratégia disponível. Gere uma análise primeiro.")]
    NoStrategy,

    #[error("Recurso disponível apenas no plano Pro.")]
    ProRequired,

    #[error("{0}")]
    Storage(String),
}

impl AppError {
    /// 稳定的错误类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Generation(e) => e.kind(),
            AppError::CreditsExhausted => "creditsExhausted",
            AppError::GenerationInProgress => "generationInProgress",
            AppError::EmptyKeyword => "emptyKeyword",
            AppError::NoStrategy => "noStrategy",
            AppError::ProRequired => "proRequired",
            AppError::Storage(_) => "storage",
        }
    }
}

/// 成功生成后返回给前端的数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub result: StrategyResult,
    /// 扣减后的额度
    pub credits: Entitlement,
}

/// 账户快照：额度、登录身份、升级状态
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub credits: Entitlement,
    pub session: Option<Session>,
    pub upgrade: UpgradeState,
}

/// 账户锁内的全部可变状态
struct Account {
    credits: EntitlementStore,
    sessions: SessionStore,
    upgrade: UpgradeFlow,
    /// 白标配置只存在内存中
    branding: BrandingConfig,
    /// 最近一次生成（或加载的示例）结果，供审计和导出使用
    strategy: Option<StrategyResult>,
}

impl Account {
    fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            credits: self.credits.current(),
            session: self.sessions.current().cloned(),
            upgrade: self.upgrade.state(),
        }
    }

    fn strategy(&self) -> Result<&StrategyResult, AppError> {
        self.strategy.as_ref().ok_or(AppError::NoStrategy)
    }

    fn require_pro(&self) -> Result<(), AppError> {
        if self.credits.current().is_pro {
            Ok(())
        } else {
            Err(AppError::ProRequired)
        }
    }
}

/// 生成进行中标志的守卫，离开作用域时清除标志（含出错路径）
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 应用全局状态
pub struct AppState {
    account: Mutex<Account>,
    client: StrategyClient,
    classifier: Box<dyn IdentityClassifier>,
    generating: AtomicBool,
}

impl AppState {
    /// 组装应用状态并恢复持久化的登录身份
    ///
    /// 恢复失败（记录无法写回）时记录警告并以访客身份继续启动。
    pub fn new(
        store: Arc<dyn RecordStore>,
        client: StrategyClient,
        classifier: Box<dyn IdentityClassifier>,
    ) -> Self {
        let mut credits = EntitlementStore::open(store.clone());
        let mut sessions = SessionStore::open(store.clone());

        match sessions.restore(&mut credits) {
            Ok(Some(session)) => log::info!("已恢复登录身份: {}", session.email),
            Ok(None) => {}
            Err(e) => {
                log::warn!("恢复登录身份失败，以访客身份继续: {}", e);
                sessions = SessionStore::open(store);
                credits.load();
            }
        }

        Self {
            account: Mutex::new(Account {
                credits,
                sessions,
                upgrade: UpgradeFlow::default(),
                branding: BrandingConfig::default(),
                strategy: None,
            }),
            client,
            classifier,
            generating: AtomicBool::new(false),
        }
    }

    /// 按运行配置创建生产环境状态
    ///
    /// 数据目录不可用时降级为内存存储（本次运行的数据不会保存）。
    pub fn from_settings(settings: &AppSettings) -> Result<Self, String> {
        let store: Arc<dyn RecordStore> = match FileStore::open(&settings.data_dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                log::warn!("数据目录不可用，本次运行改用内存存储: {}", e);
                Arc::new(MemoryStore::new())
            }
        };

        let backend = Arc::new(GeminiBackend::new(settings)?);
        let client = StrategyClient::new(settings.api_key.as_deref(), backend);
        if !client.has_credential() {
            log::warn!("未配置可用的 API_KEY，生成请求将直接失败");
        }

        Ok(Self::new(store, client, Box::new(SubstringClassifier::default())))
    }

    /// 当前账户快照
    pub async fn snapshot(&self) -> AccountSnapshot {
        self.account.lock().await.snapshot()
    }

    /// 为关键词生成 SEO 策略
    ///
    /// 成功后保存结果为当前策略，非 Pro 用户扣减一次额度。
    /// 额度写入失败只记录日志，不影响已经拿到的结果。
    ///
    /// # 错误
    /// - `EmptyKeyword` - 关键词为空白
    /// - `CreditsExhausted` - 免费额度已用完（不发起网络请求）
    /// - `GenerationInProgress` - 已有生成在进行
    /// - `Generation(_)` - 请求客户端返回的失败
    pub async fn generate(&self, keyword: &str) -> Result<GenerationOutcome, AppError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::EmptyKeyword);
        }

        if !self.account.lock().await.credits.can_generate() {
            return Err(AppError::CreditsExhausted);
        }

        if self.generating.swap(true, Ordering::SeqCst) {
            return Err(AppError::GenerationInProgress);
        }
        let _in_flight = InFlight(&self.generating);

        log::info!("开始为关键词 \"{}\" 生成策略", keyword);
        let result = self.client.generate(keyword).await?;

        let mut account = self.account.lock().await;
        let credits = if account.credits.current().is_pro {
            account.credits.current()
        } else {
            account.credits.consume().unwrap_or_else(|e| {
                log::error!("额度写入失败: {}", e);
                account.credits.current()
            })
        };
        account.strategy = Some(result.clone());

        Ok(GenerationOutcome { result, credits })
    }

    /// 加载内置示例结果（不消耗额度）
    pub async fn load_sample(&self) -> StrategyResult {
        let sample = StrategyResult::sample();
        self.account.lock().await.strategy = Some(sample.clone());
        sample
    }

    /// 当前策略结果
    pub async fn current_strategy(&self) -> Option<StrategyResult> {
        self.account.lock().await.strategy.clone()
    }

    /// 当前策略的审计表格
    pub async fn audit(&self) -> Result<Vec<AuditRow>, AppError> {
        let account = self.account.lock().await;
        Ok(audit::audit_rows(account.strategy()?))
    }

    /// 以邮箱登录
    pub async fn login(&self, email: &str) -> Result<AccountSnapshot, String> {
        let session = session::identify(email, self.classifier.as_ref())?;
        let mut guard = self.account.lock().await;
        let account = &mut *guard;
        account.sessions.login(session, &mut account.credits)?;
        log::info!("用户登录: {}", email.trim());
        Ok(account.snapshot())
    }

    /// 登出，回到访客模式
    pub async fn logout(&self) -> Result<AccountSnapshot, String> {
        let mut guard = self.account.lock().await;
        let account = &mut *guard;
        account.sessions.logout(&mut account.credits)?;
        log::info!("用户已登出");
        Ok(account.snapshot())
    }

    /// 执行模拟升级：进入 Processing，等待 `delay` 后激活
    ///
    /// # 返回值
    /// - `Some(entitlement)` - 本次调用完成了激活
    /// - `None` - 已有激活在进行，本次触发被忽略
    pub async fn activate_pro(&self, delay: Duration) -> Result<Option<Entitlement>, String> {
        if !self.account.lock().await.upgrade.begin() {
            return Ok(None);
        }

        tokio::time::sleep(delay).await;

        let mut guard = self.account.lock().await;
        let account = &mut *guard;
        let granted = account.upgrade.complete(&mut account.credits)?;
        // 已购买的额度不再被登出时的暂存记录覆盖
        account.sessions.discard_stash()?;
        Ok(Some(granted))
    }

    /// 检查页面地址是否为支付回跳，是则执行激活
    ///
    /// 非权威：仅凭客户端可控的查询参数即授予 Pro。
    pub async fn handle_payment_return(
        &self,
        location: &str,
        delay: Duration,
    ) -> Result<Option<Entitlement>, String> {
        if !upgrade::is_payment_return(location) {
            return Ok(None);
        }
        log::info!("检测到支付回跳参数，开始本地激活");
        self.activate_pro(delay).await
    }

    /// 取走一次性的激活成功通知
    pub async fn take_upgrade_notification(&self) -> bool {
        self.account.lock().await.upgrade.take_notification()
    }

    pub async fn branding(&self) -> BrandingConfig {
        self.account.lock().await.branding.clone()
    }

    /// 更新白标配置
    pub async fn update_branding(&self, config: BrandingConfig) -> Result<BrandingConfig, String> {
        let mut account = self.account.lock().await;
        let validated = branding::validate(config, &account.credits.current())?;
        account.branding = validated.clone();
        Ok(validated)
    }

    /// 恢复默认白标配置
    pub async fn reset_branding(&self) -> BrandingConfig {
        let mut account = self.account.lock().await;
        account.branding = BrandingConfig::default();
        account.branding.clone()
    }

    /// 审计表格的剪贴板文本
    pub async fn export_clipboard_text(&self) -> Result<String, AppError> {
        let account = self.account.lock().await;
        Ok(export::to_clipboard_text(&audit::audit_rows(account.strategy()?)))
    }

    /// 审计表格 CSV（Pro）
    pub async fn export_csv(&self) -> Result<String, AppError> {
        let account = self.account.lock().await;
        account.require_pro()?;
        Ok(export::to_csv(&audit::audit_rows(account.strategy()?)))
    }

    /// Markdown 策略报告（Pro），按生效的白标配置署名
    pub async fn export_report(&self, issued_on: &str) -> Result<String, AppError> {
        let account = self.account.lock().await;
        account.require_pro()?;
        let credits = account.credits.current();
        let brand = branding::effective(&account.branding, &credits);
        Ok(export::to_markdown_report(account.strategy()?, brand, issued_on))
    }
}
