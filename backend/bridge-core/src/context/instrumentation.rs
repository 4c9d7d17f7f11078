//! Script that attaches session headers to the content's own requests.
//!
//! Page script state is discarded on every navigation, so the bridge must
//! evaluate this script again on every load-start. Re-evaluating on the same
//! page only swaps the header table; the hooks are installed once per page.

use models::{HeaderSet, ModelError};

const NAMESPACE_PLACEHOLDER: &str = "__NAMESPACE__";
const HEADERS_PLACEHOLDER: &str = "__HEADERS__";

const INSTRUMENTATION_TEMPLATE: &str = r#"(function (headers) {
  var w = window;
  w.__NAMESPACE__Headers = headers;
  if (w.__NAMESPACE__Instrumented) { return; }
  w.__NAMESPACE__Instrumented = true;
  var apply = function (setHeader) {
    var current = w.__NAMESPACE__Headers || {};
    Object.keys(current).forEach(function (name) { setHeader(name, current[name]); });
  };
  var open = XMLHttpRequest.prototype.open;
  XMLHttpRequest.prototype.open = function () {
    var result = open.apply(this, arguments);
    var xhr = this;
    apply(function (name, value) { xhr.setRequestHeader(name, value); });
    return result;
  };
  if (typeof w.fetch === "function") {
    var originalFetch = w.fetch;
    w.fetch = function (input, init) {
      init = init || {};
      var merged = new Headers(init.headers || (input instanceof Request ? input.headers : undefined));
      apply(function (name, value) { merged.set(name, value); });
      init.headers = merged;
      return originalFetch.call(this, input, init);
    };
  }
})(__HEADERS__);"#;

/// Build the instrumentation script for `namespace` carrying `headers`.
///
/// `namespace` must already be a validated JavaScript identifier.
pub fn header_instrumentation_script(namespace: &str, headers: &HeaderSet) -> Result<String, ModelError> {
    let headers_json = script_safe_json(&serde_json::to_string(headers)?);

    Ok(INSTRUMENTATION_TEMPLATE
        .replace(NAMESPACE_PLACEHOLDER, namespace)
        .replace(HEADERS_PLACEHOLDER, &headers_json))
}

/// JSON is a JavaScript literal except for raw U+2028/U+2029 in strings.
pub(crate) fn script_safe_json(json: &str) -> String {
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}
