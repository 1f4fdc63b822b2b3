use axum::{extract::State, response::Html};

use crate::routes::AppState;

/// Handler for GET / - minimal page polling /logs
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>hostlog</title></head>
<body>
<button id="btnClearLogs">Clear logs</button>
<div id="logs">No logs to see.</div>
<script>
const logsEl = document.getElementById("logs");
function render(body) {{
  if (!body.logs || body.logs.length === 0) {{
    logsEl.textContent = "No logs to see.";
    return;
  }}
  const list = document.createElement("ul");
  for (const line of body.logs) {{
    const item = document.createElement("li");
    item.textContent = line;
    list.appendChild(item);
  }}
  logsEl.replaceChildren(list);
  window.scrollTo(0, document.body.scrollHeight);
}}
function updateLogs() {{
  fetch("logs").then(r => r.json()).then(render);
}}
document.getElementById("btnClearLogs").addEventListener("click", () => {{
  fetch("logs/clear", {{ method: "POST" }}).then(r => r.json()).then(render);
}});
updateLogs();
setInterval(updateLogs, {interval});
</script>
</body>
</html>
"#,
        interval = state.refresh.as_millis()
    ))
}
