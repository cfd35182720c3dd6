//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JByteArray, JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;

use crate::layout_bytes_to_json;

/// Import MusicXML bytes and return the staff layout as JSON.
///
/// Called from Kotlin as:
///   external fun layoutBytes(data: ByteArray, extension: String?, configJson: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_stafflayout_StaffLayout_layoutBytes(
    mut env: JNIEnv,
    _class: JClass,
    data: JByteArray,
    extension: JString,
    config_json: JString,
) -> jstring {
    let bytes = match env.convert_byte_array(&data) {
        Ok(b) => b,
        Err(_) => return std::ptr::null_mut(),
    };

    let ext: Option<String> = if extension.is_null() {
        None
    } else {
        env.get_string(&extension).ok().map(|s| s.into())
    };
    let config: Option<String> = if config_json.is_null() {
        None
    } else {
        env.get_string(&config_json).ok().map(|s| s.into())
    };

    match layout_bytes_to_json(&bytes, ext.as_deref(), config.as_deref()) {
        Ok(json) => match env.new_string(&json) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(e) => {
            log::warn!("layoutBytes failed: {e}");
            std::ptr::null_mut()
        }
    }
}
