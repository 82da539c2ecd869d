//! C-callable callback registry for server list updates, account state
//! changes, and errors.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::ffi::CString;
use std::os::raw::{c_char, c_void};

// ── Callback type aliases ───────────────────────────────────────────────────

/// `fn(server_list_version: u64, user_context: *mut c_void)`
pub type ServersUpdatedCallback = Option<unsafe extern "C" fn(u64, *mut c_void)>;

/// `fn(account_state_code: i32, user_context: *mut c_void)`
pub type AccountStateCallback = Option<unsafe extern "C" fn(i32, *mut c_void)>;

/// `fn(error_code: i32, message: *const c_char, user_context: *mut c_void)`
pub type ErrorCallback = Option<unsafe extern "C" fn(i32, *const c_char, *mut c_void)>;

// ── Send + Sync wrapper for raw pointers ────────────────────────────────────

/// Wrapper so that raw user-context pointers can be stored in a `Mutex`.
/// The caller is responsible for thread-safety of the pointed-to data.
#[derive(Clone, Copy)]
struct SendPtr(*mut c_void);
unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}

impl Default for SendPtr {
    fn default() -> Self {
        SendPtr(std::ptr::null_mut())
    }
}

// ── Registry ────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct CallbackRegistry {
    servers_cb: ServersUpdatedCallback,
    servers_ctx: SendPtr,

    account_cb: AccountStateCallback,
    account_ctx: SendPtr,

    error_cb: ErrorCallback,
    error_ctx: SendPtr,
}

pub static CALLBACKS: Lazy<Mutex<CallbackRegistry>> =
    Lazy::new(|| Mutex::new(CallbackRegistry::default()));

// ── Registration ────────────────────────────────────────────────────────────

pub fn register_servers_updated_callback(cb: ServersUpdatedCallback, ctx: *mut c_void) {
    let mut reg = CALLBACKS.lock();
    reg.servers_cb = cb;
    reg.servers_ctx = SendPtr(ctx);
}

pub fn register_account_state_callback(cb: AccountStateCallback, ctx: *mut c_void) {
    let mut reg = CALLBACKS.lock();
    reg.account_cb = cb;
    reg.account_ctx = SendPtr(ctx);
}

pub fn register_error_callback(cb: ErrorCallback, ctx: *mut c_void) {
    let mut reg = CALLBACKS.lock();
    reg.error_cb = cb;
    reg.error_ctx = SendPtr(ctx);
}

// ── Invocation helpers ──────────────────────────────────────────────────────

/// Notify the host application that the server list changed.
pub fn fire_servers_updated(version: u64) {
    let reg = CALLBACKS.lock();
    if let Some(cb) = reg.servers_cb {
        let ctx = reg.servers_ctx.0;
        // Drop lock before calling into foreign code to avoid deadlocks.
        drop(reg);
        unsafe { cb(version, ctx) };
    }
}

/// Notify the host application that the account state changed.
pub fn fire_account_state(code: i32) {
    let reg = CALLBACKS.lock();
    if let Some(cb) = reg.account_cb {
        let ctx = reg.account_ctx.0;
        drop(reg);
        unsafe { cb(code, ctx) };
    }
}

/// Notify the host application of an error.
pub fn fire_error(code: i32, msg: &str) {
    let reg = CALLBACKS.lock();
    if let Some(cb) = reg.error_cb {
        let ctx = reg.error_ctx.0;
        drop(reg);
        if let Ok(c_msg) = CString::new(msg) {
            unsafe { cb(code, c_msg.as_ptr(), ctx) };
        }
    }
}
