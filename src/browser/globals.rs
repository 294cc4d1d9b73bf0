//! Reflect utility wrappers for reading browser globals.
//!
//! Fingerprint attributes are read through `Reflect` rather than typed
//! `web-sys` getters: many of them are vendor-specific (`oscpu`,
//! `deviceMemory`, `connection`) and absent attributes must read as
//! `None` instead of throwing.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Get a property from the global scope.
pub fn get_global(prop: &str) -> Option<JsValue> {
    get(&js_sys::global(), prop)
}

/// Get a property, treating `undefined` and `null` as absent.
pub fn get(obj: &JsValue, prop: &str) -> Option<JsValue> {
    if obj.is_undefined() || obj.is_null() {
        return None;
    }
    Reflect::get(obj, &JsValue::from_str(prop))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

pub fn get_string(obj: &JsValue, prop: &str) -> Option<String> {
    get(obj, prop).and_then(|v| v.as_string())
}

pub fn get_f64(obj: &JsValue, prop: &str) -> Option<f64> {
    get(obj, prop).and_then(|v| v.as_f64())
}

pub fn get_bool(obj: &JsValue, prop: &str) -> Option<bool> {
    get(obj, prop).and_then(|v| v.as_bool())
}

/// `prop in obj`, also true for properties that hold `null`.
pub fn has(obj: &JsValue, prop: &str) -> bool {
    if !obj.is_object() {
        return false;
    }
    Reflect::has(obj, &JsValue::from_str(prop)).unwrap_or(false)
}

/// Call `obj[method]()` if it is a function.
pub fn call_method0(obj: &JsValue, method: &str) -> Option<Result<JsValue, JsValue>> {
    let func: Function = get(obj, method)?.dyn_into().ok()?;
    Some(func.call0(obj))
}

/// Items of an array-like object (`length` + numeric indices).
pub fn array_like(obj: &JsValue) -> Vec<JsValue> {
    let len = get_f64(obj, "length").unwrap_or(0.0).max(0.0) as u32;
    (0..len)
        .filter_map(|i| Reflect::get_u32(obj, i).ok())
        .filter(|v| !v.is_undefined() && !v.is_null())
        .collect()
}
