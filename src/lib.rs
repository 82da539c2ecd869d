//! vpnlist SDK: VPN server catalog, ranking and access policy
//!
//! The Rust API lives in the public modules; the `extern "C"` functions below
//! expose it to mobile and desktop hosts via `cdylib`. Data crosses the FFI
//! boundary as JSON strings. Network work is dispatched through the global
//! Tokio runtime (`runtime().block_on()`).

pub mod account;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod policy;
pub mod ranking;

mod callbacks;
mod error;
mod runtime;

pub use error::SdkError;

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::ptr;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;

use account::{Account, AccountStateTracker};
use callbacks::{
    fire_account_state, fire_error, fire_servers_updated, register_account_state_callback,
    register_error_callback, register_servers_updated_callback,
};
use catalog::{ServerCatalog, ServerListResponse, ServerListSource};
use config::SdkConfig;
use error::{
    clear_error, last_error_code, set_sdk_error, take_last_error, ERROR_NOT_INITIALIZED,
    SUCCESS,
};
use logging::LogCategory;
use metadata::{PartnershipLookup, PartnershipsRepository, StreamingLookup, StreamingServicesModel};
use models::{
    FeatureFlags, PartnerType, Server, ServerTier, StreamingServicesResponse, VpnCountry,
};
use policy::{connect_decision, partition_countries, VpnUser};
use ranking::{servers_for_country, RankingContext};
use runtime::runtime;

// ── Global SDK state ────────────────────────────────────────────────────────

struct SdkState {
    config: SdkConfig,
    catalog: ServerCatalog,
    partnerships: Option<PartnershipsRepository>,
    streaming: Option<StreamingServicesModel>,
    feature_flags: FeatureFlags,
    user: Option<VpnUser>,
    secure_core: bool,
    accounts: AccountStateTracker,
}

impl SdkState {
    fn new(config: SdkConfig) -> Self {
        Self {
            config,
            catalog: ServerCatalog::new_empty(),
            partnerships: None,
            streaming: None,
            feature_flags: FeatureFlags::default(),
            user: None,
            secure_core: false,
            accounts: AccountStateTracker::new(),
        }
    }

    fn ranking_context(&self) -> RankingContext<'_> {
        RankingContext {
            user: self.user.as_ref(),
            secure_core: self.secure_core,
            partnerships: self
                .partnerships
                .as_ref()
                .map(|p| p as &dyn PartnershipLookup),
            streaming: self
                .streaming
                .as_ref()
                .map(|s| s as &dyn StreamingLookup),
        }
    }

    fn country(&self, code: &str) -> Result<&VpnCountry, SdkError> {
        self.catalog
            .vpn_exit_country(code, self.secure_core)
            .ok_or_else(|| SdkError::NotFound(format!("country {}", code)))
    }

    fn server(&self, name: &str) -> Result<&Server, SdkError> {
        self.catalog
            .server_by_name(name)
            .ok_or_else(|| SdkError::NotFound(format!("server {}", name)))
    }
}

static SDK: Lazy<Mutex<Option<SdkState>>> = Lazy::new(|| Mutex::new(None));

#[derive(Serialize)]
struct CountrySummary<'a> {
    flag: &'a str,
    secure_core: bool,
    server_count: usize,
    has_accessible_online_server: bool,
    under_maintenance: bool,
}

impl<'a> CountrySummary<'a> {
    fn new(country: &'a VpnCountry, user: Option<&VpnUser>) -> Self {
        Self {
            flag: &country.flag,
            secure_core: country.secure_core,
            server_count: country.servers().len(),
            has_accessible_online_server: country.has_accessible_online_server(user),
            under_maintenance: country.is_under_maintenance(),
        }
    }
}

#[derive(Serialize)]
struct CountryList<'a> {
    secure_core: bool,
    version: u64,
    source: String,
    free: Vec<CountrySummary<'a>>,
    premium: Vec<CountrySummary<'a>>,
}

/// Convenience: run `body` while holding the SDK lock.
/// Returns `ERROR_NOT_INITIALIZED` (and sets the last-error) when the SDK has
/// not been initialised yet.
fn with_sdk<F, R>(body: F) -> R
where
    F: FnOnce(&mut SdkState) -> R,
    R: From<i32>,
{
    let mut guard = SDK.lock();
    match guard.as_mut() {
        Some(state) => body(state),
        None => {
            let err = SdkError::NotInitialized;
            set_sdk_error(&err);
            R::from(ERROR_NOT_INITIALIZED)
        }
    }
}

/// Like `with_sdk`, for functions returning a heap string (null on error).
fn with_sdk_json<F>(body: F) -> *mut c_char
where
    F: FnOnce(&SdkState) -> Result<Option<String>, SdkError>,
{
    let guard = SDK.lock();
    let state = match guard.as_ref() {
        Some(s) => s,
        None => {
            set_sdk_error(&SdkError::NotInitialized);
            return ptr::null_mut();
        }
    };

    match body(state) {
        Ok(Some(json)) => to_c_string(&json),
        Ok(None) => ptr::null_mut(),
        Err(e) => {
            set_sdk_error(&e);
            ptr::null_mut()
        }
    }
}

/// Record an error, notify the host, and return its code.
fn report(err: SdkError) -> i32 {
    log::warn!(target: LogCategory::App.target(), "{}", err);
    set_sdk_error(&err);
    fire_error(err.code(), &err.to_string());
    err.code()
}

/// Allocate a C string on the heap.  Caller frees via `vpnlist_free_string`.
fn to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read a `*const c_char` into a `&str`, returning `None` on null or invalid UTF-8.
unsafe fn from_c_str<'a>(p: *const c_char) -> Option<&'a str> {
    if p.is_null() {
        return None;
    }
    CStr::from_ptr(p).to_str().ok()
}

/// Read a required string argument, recording an error when missing.
unsafe fn required_arg(p: *const c_char, name: &str) -> Result<String, SdkError> {
    from_c_str(p)
        .map(str::to_string)
        .ok_or_else(|| SdkError::InvalidParam(format!("{} is null or invalid", name)))
}

fn init_with(config: SdkConfig) -> i32 {
    let mut guard = SDK.lock();
    if guard.is_some() {
        return SUCCESS; // already initialised
    }

    // Initialise logger (ignore errors if already set)
    let _ = env_logger::try_init();

    log::info!(
        target: LogCategory::App.target(),
        "vpnlist SDK v{} initialising (api: {})",
        env!("CARGO_PKG_VERSION"),
        config.api_base_url
    );

    *guard = Some(SdkState::new(config));
    SUCCESS
}

/// Install a new server list and notify the host once the lock is released.
fn install_servers(servers: Vec<Server>, source: ServerListSource) -> i32 {
    let version = {
        let mut guard = SDK.lock();
        let state = match guard.as_mut() {
            Some(s) => s,
            None => {
                set_sdk_error(&SdkError::NotInitialized);
                return ERROR_NOT_INITIALIZED;
            }
        };
        state.catalog.set_servers(servers, source);
        state.catalog.server_list_version()
    };
    fire_servers_updated(version);
    SUCCESS
}

fn countries_json(state: &SdkState) -> Result<String, SdkError> {
    let user = state.user.as_ref();
    let countries = state.catalog.countries_for_list(state.secure_core);
    let (free, premium) = partition_countries(countries, user);
    let summarize = |list: Vec<_>| {
        list.into_iter()
            .map(|c| CountrySummary::new(c, user))
            .collect::<Vec<_>>()
    };

    let list = CountryList {
        secure_core: state.secure_core,
        version: state.catalog.server_list_version(),
        source: state.catalog.source.to_string(),
        free: summarize(free),
        premium: summarize(premium),
    };
    Ok(serde_json::to_string(&list)?)
}

fn country_groups_json(state: &SdkState, code: &str) -> Result<String, SdkError> {
    let country = state.country(code)?;
    let groups = servers_for_country(country, &state.ranking_context());
    Ok(serde_json::to_string(&groups)?)
}

fn best_server_json(state: &SdkState, code: Option<&str>) -> Result<Option<String>, SdkError> {
    let user = state.user.as_ref();
    let best = match code {
        Some(code) => {
            let country = state.country(code)?;
            state.catalog.best_score_server_in(country, user)
        }
        None => state.catalog.best_score_server_overall(user),
    };
    best.map(|server| serde_json::to_string(server).map_err(SdkError::from))
        .transpose()
}

#[derive(Serialize)]
struct StreamingEntry<'a> {
    name: &'a str,
    icon_url: String,
}

fn streaming_services_json(state: &SdkState, code: &str) -> Result<String, SdkError> {
    // Without a user only free-tier services are listed.
    let tier = state
        .user
        .as_ref()
        .map_or(ServerTier::Free, |u| ServerTier::from_api(u.max_tier.clamp(0, 3)));
    let entries: Vec<StreamingEntry<'_>> = match state.streaming.as_ref() {
        Some(model) => model
            .for_tier(&code.to_uppercase(), tier)
            .into_iter()
            .map(|service| StreamingEntry {
                name: &service.name,
                icon_url: model.icon_url(service),
            })
            .collect(),
        None => Vec::new(),
    };
    Ok(serde_json::to_string(&entries)?)
}

fn server_partners_json(state: &SdkState, name: &str) -> Result<String, SdkError> {
    let server = state.server(name)?;
    let partners = state
        .partnerships
        .as_ref()
        .map(|repo| repo.server_partnerships(server))
        .unwrap_or_default();
    Ok(serde_json::to_string(&partners)?)
}

fn connect_check(state: &SdkState, name: Option<&str>) -> Result<i32, SdkError> {
    let server = name.map(|n| state.server(n)).transpose()?;
    let decision = connect_decision(state.user.as_ref(), server);
    log::info!(
        target: LogCategory::ConnConnect.target(),
        "Connect check for {}: {:?}",
        name.unwrap_or("<fastest>"),
        decision
    );
    Ok(decision.code())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Core (5)
// ═══════════════════════════════════════════════════════════════════════════

/// Initialise the SDK with default configuration.
/// Returns 0 on success, negative on error.
#[no_mangle]
pub extern "C" fn vpnlist_init() -> i32 {
    clear_error();
    init_with(SdkConfig::default())
}

/// Initialise the SDK with a JSON configuration (see `SdkConfig`).
/// Returns 0 on success, negative on error.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_init_with_config(config_json: *const c_char) -> i32 {
    clear_error();

    let config = match required_arg(config_json, "config_json").and_then(|raw| SdkConfig::from_json(&raw)) {
        Ok(c) => c,
        Err(e) => {
            set_sdk_error(&e);
            return e.code();
        }
    };
    init_with(config)
}

/// Tear down the SDK and drop all state.
#[no_mangle]
pub extern "C" fn vpnlist_cleanup() {
    clear_error();

    let mut guard = SDK.lock();
    if guard.take().is_some() {
        log::info!(target: LogCategory::App.target(), "vpnlist SDK cleaned up");
    }
}

/// Return the SDK version string.  Caller must free with `vpnlist_free_string`.
#[no_mangle]
pub extern "C" fn vpnlist_version() -> *mut c_char {
    to_c_string(env!("CARGO_PKG_VERSION"))
}

/// Free a string previously returned by the SDK.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Servers (3)
// ═══════════════════════════════════════════════════════════════════════════

/// Fetch the server list from the API (or cache).  Returns 0 on success.
#[no_mangle]
pub extern "C" fn vpnlist_servers_fetch() -> i32 {
    clear_error();

    let config = {
        let guard = SDK.lock();
        match guard.as_ref() {
            Some(state) => state.config.clone(),
            None => {
                set_sdk_error(&SdkError::NotInitialized);
                return ERROR_NOT_INITIALIZED;
            }
        }
    };

    match runtime().block_on(catalog::load_server_list(&config)) {
        Ok((servers, source)) => install_servers(servers, source),
        Err(e) => report(e),
    }
}

/// Load a `{"LogicalServers":[...]}` payload obtained by the host.
/// Returns 0 on success.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_servers_set_json(json: *const c_char) -> i32 {
    clear_error();

    match required_arg(json, "json").and_then(|raw| ServerListResponse::from_json(&raw)) {
        Ok(response) => install_servers(response.logical_servers, ServerListSource::Provided),
        Err(e) => report(e),
    }
}

/// Current server list version (0 before the first load), negative on error.
#[no_mangle]
pub extern "C" fn vpnlist_servers_version() -> i64 {
    clear_error();
    with_sdk(|state| state.catalog.server_list_version() as i64)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Metadata (5)
// ═══════════════════════════════════════════════════════════════════════════

/// Load partnerships (`[{"Type":..., "Partners":[...]}]`).  Returns 0 on success.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_partnerships_set_json(json: *const c_char) -> i32 {
    clear_error();

    let partner_types: Vec<PartnerType> = match required_arg(json, "json")
        .and_then(|raw| serde_json::from_str(&raw).map_err(SdkError::from))
    {
        Ok(p) => p,
        Err(e) => return report(e),
    };

    with_sdk(|state| {
        state.partnerships = Some(PartnershipsRepository::new(partner_types));
        SUCCESS
    })
}

/// Load streaming services (`{"ResourceBaseURL":..., "StreamingServices":{...}}`).
#[no_mangle]
pub unsafe extern "C" fn vpnlist_streaming_set_json(json: *const c_char) -> i32 {
    clear_error();

    let response: StreamingServicesResponse = match required_arg(json, "json")
        .and_then(|raw| serde_json::from_str(&raw).map_err(SdkError::from))
    {
        Ok(r) => r,
        Err(e) => return report(e),
    };

    with_sdk(|state| {
        state.streaming = Some(StreamingServicesModel::new(response));
        SUCCESS
    })
}

/// Load client feature flags (`{"NetShield":1,"GuestHoles":0}`).
#[no_mangle]
pub unsafe extern "C" fn vpnlist_feature_flags_set_json(json: *const c_char) -> i32 {
    clear_error();

    let flags: FeatureFlags = match required_arg(json, "json")
        .and_then(|raw| serde_json::from_str(&raw).map_err(SdkError::from))
    {
        Ok(f) => f,
        Err(e) => return report(e),
    };

    with_sdk(|state| {
        log::debug!(target: LogCategory::Settings.target(), "Feature flags: {:?}", flags);
        state.feature_flags = flags;
        SUCCESS
    })
}

/// Partners running a server, as a JSON array.  Caller must free the result.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_server_partners_json(server_name: *const c_char) -> *mut c_char {
    clear_error();

    let name = match required_arg(server_name, "server_name") {
        Ok(n) => n,
        Err(e) => {
            set_sdk_error(&e);
            return ptr::null_mut();
        }
    };
    with_sdk_json(|state| server_partners_json(state, &name).map(Some))
}

/// Streaming services unlocked for the current user in a country, as
/// `[{"name":..., "icon_url":...}]`.  Caller must free the result.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_streaming_services_json(
    country_code: *const c_char,
) -> *mut c_char {
    clear_error();

    let code = match required_arg(country_code, "country_code") {
        Ok(c) => c,
        Err(e) => {
            set_sdk_error(&e);
            return ptr::null_mut();
        }
    };
    with_sdk_json(|state| streaming_services_json(state, &code).map(Some))
}

// ═══════════════════════════════════════════════════════════════════════════
//  User & settings (5)
// ═══════════════════════════════════════════════════════════════════════════

/// Set the cached VPN user (`{"userId":..., "maxTier":2, ...}`).
#[no_mangle]
pub unsafe extern "C" fn vpnlist_user_set_json(json: *const c_char) -> i32 {
    clear_error();

    let user: VpnUser = match required_arg(json, "json")
        .and_then(|raw| serde_json::from_str(&raw).map_err(SdkError::from))
    {
        Ok(u) => u,
        Err(e) => return report(e),
    };

    with_sdk(|state| {
        log::info!(
            target: LogCategory::UserPlan.target(),
            "User plan: {} (max tier {})",
            user.plan_name.as_deref().unwrap_or("unknown"),
            user.max_tier
        );
        state.user = Some(user);
        SUCCESS
    })
}

/// Forget the cached VPN user.
#[no_mangle]
pub extern "C" fn vpnlist_user_clear() -> i32 {
    clear_error();
    with_sdk(|state| {
        state.user = None;
        SUCCESS
    })
}

/// Enable (1) or disable (0) secure core routing for list queries.
#[no_mangle]
pub extern "C" fn vpnlist_set_secure_core(enabled: i32) -> i32 {
    clear_error();
    with_sdk(|state| {
        state.secure_core = enabled != 0;
        log::info!(
            target: LogCategory::Settings.target(),
            "Secure core {}",
            if state.secure_core { "enabled" } else { "disabled" }
        );
        SUCCESS
    })
}

/// Whether guest holes are enabled: 1 yes, 0 no, negative on error.
#[no_mangle]
pub extern "C" fn vpnlist_guest_hole_enabled() -> i32 {
    clear_error();
    with_sdk(|state| i32::from(state.feature_flags.guest_hole_enabled()))
}

/// Whether NetShield is enabled: 1 yes, 0 no, negative on error.
#[no_mangle]
pub extern "C" fn vpnlist_net_shield_enabled() -> i32 {
    clear_error();
    with_sdk(|state| i32::from(state.feature_flags.net_shield_enabled()))
}

// ═══════════════════════════════════════════════════════════════════════════
//  Server list queries (4)
// ═══════════════════════════════════════════════════════════════════════════

/// Countries for the current routing mode, split into those the user can
/// access and premium ones.  Caller must free the returned string.
///
/// JSON shape: `{"secure_core":false,"free":[...],"premium":[...],...}`
#[no_mangle]
pub extern "C" fn vpnlist_countries_get_json() -> *mut c_char {
    clear_error();
    with_sdk_json(|state| countries_json(state).map(Some))
}

/// Ranked server groups for one country.  Caller must free the result.
///
/// JSON shape: `[{"title":{"kind":"fastest","info":null},"servers":[...]}, ...]`
#[no_mangle]
pub unsafe extern "C" fn vpnlist_country_groups_json(country_code: *const c_char) -> *mut c_char {
    clear_error();

    let code = match required_arg(country_code, "country_code") {
        Ok(c) => c,
        Err(e) => {
            set_sdk_error(&e);
            return ptr::null_mut();
        }
    };
    with_sdk_json(|state| country_groups_json(state, &code).map(Some))
}

/// Best-score server of a country, or across all countries when
/// `country_code` is null.  Returns null when no server qualifies.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_best_server_json(country_code: *const c_char) -> *mut c_char {
    clear_error();

    let code = from_c_str(country_code).map(str::to_string);
    with_sdk_json(|state| best_server_json(state, code.as_deref()))
}

/// Check whether connecting to `server_name` may proceed.  Pass null for a
/// target resolved later (e.g. fastest).
///
/// Returns 0 connect, 1 upgrade required, 2 maintenance, negative on error.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_connect_check(server_name: *const c_char) -> i32 {
    clear_error();

    let name = from_c_str(server_name).map(str::to_string);
    with_sdk(|state| match connect_check(state, name.as_deref()) {
        Ok(code) => code,
        Err(e) => {
            set_sdk_error(&e);
            e.code()
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════
//  Accounts (2)
// ═══════════════════════════════════════════════════════════════════════════

/// Feed the accounts known on device (`[{"userId":..,"state":"ready"}]`).
/// Returns the resulting account state code (0 initial, 1 login needed,
/// 2 ready), negative on error.
#[no_mangle]
pub unsafe extern "C" fn vpnlist_accounts_set_json(json: *const c_char) -> i32 {
    clear_error();

    let accounts: Vec<Account> = match required_arg(json, "json")
        .and_then(|raw| serde_json::from_str(&raw).map_err(SdkError::from))
    {
        Ok(a) => a,
        Err(e) => return report(e),
    };

    let (code, changed) = {
        let mut guard = SDK.lock();
        let state = match guard.as_mut() {
            Some(s) => s,
            None => {
                set_sdk_error(&SdkError::NotInitialized);
                return ERROR_NOT_INITIALIZED;
            }
        };
        let changed = state.accounts.update(&accounts).is_some();
        (state.accounts.state().code(), changed)
    };

    if changed {
        fire_account_state(code);
    }
    code
}

/// Current account state code, negative on error.
#[no_mangle]
pub extern "C" fn vpnlist_account_state() -> i32 {
    clear_error();
    with_sdk(|state| state.accounts.state().code())
}

// ═══════════════════════════════════════════════════════════════════════════
//  Callbacks (3)
// ═══════════════════════════════════════════════════════════════════════════

/// Register a callback for server list updates.
///
/// Signature: `fn(server_list_version: u64, user_context: *mut c_void)`
#[no_mangle]
pub extern "C" fn vpnlist_on_servers_updated(
    cb: Option<unsafe extern "C" fn(u64, *mut c_void)>,
    ctx: *mut c_void,
) {
    register_servers_updated_callback(cb, ctx);
}

/// Register a callback for account state changes.
///
/// Signature: `fn(account_state_code: i32, user_context: *mut c_void)`
#[no_mangle]
pub extern "C" fn vpnlist_on_account_state(
    cb: Option<unsafe extern "C" fn(i32, *mut c_void)>,
    ctx: *mut c_void,
) {
    register_account_state_callback(cb, ctx);
}

/// Register a callback for errors.
///
/// Signature: `fn(error_code: i32, message: *const c_char, user_context: *mut c_void)`
#[no_mangle]
pub extern "C" fn vpnlist_on_error(
    cb: Option<unsafe extern "C" fn(i32, *const c_char, *mut c_void)>,
    ctx: *mut c_void,
) {
    register_error_callback(cb, ctx);
}

// ═══════════════════════════════════════════════════════════════════════════
//  Error (3)
// ═══════════════════════════════════════════════════════════════════════════

/// Get the last error message.  Returns null if no error.
/// Caller must free the returned string.
#[no_mangle]
pub extern "C" fn vpnlist_get_last_error() -> *mut c_char {
    match take_last_error() {
        Some(msg) => to_c_string(&msg),
        None => ptr::null_mut(),
    }
}

/// Get the last error code.  Returns 0 (`SUCCESS`) if no error.
#[no_mangle]
pub extern "C" fn vpnlist_get_last_error_code() -> i32 {
    last_error_code()
}

/// Clear the stored error state.
#[no_mangle]
pub extern "C" fn vpnlist_clear_error() {
    clear_error();
}
