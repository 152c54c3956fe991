use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

// 除字母数字外只保留 `_.-~` 和 `!~*'()`，其余全部转义，服务端对此很敏感
const THREADS_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 按登录和发帖接口要求的字符集做百分号编码
pub fn quote_payload(src: &str) -> String {
    utf8_percent_encode(src, THREADS_ENCODE_SET).to_string()
}
