//! Embedded HTML/CSS/JS frontend for the metricdash web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. All rendering
//! happens server-side; the script only forwards clicks to the API and
//! swaps in the returned fragments.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Malware Detection System</title>
<style>
:root {
  --bg-a: #05001A;
  --bg-b: #140032;
  --accent: #00d4ff;
  --accent-soft: rgba(0, 212, 255, 0.3);
  --accent-faint: rgba(0, 212, 255, 0.1);
  --panel: rgba(0, 0, 0, 0.5);
  --radius: 10px;
  --font: 'Orbitron', 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  min-height: 100vh;
  color: var(--accent);
  font-family: var(--font);
  background: linear-gradient(135deg, var(--bg-a), var(--bg-b), var(--bg-a), var(--bg-b), var(--bg-a));
  background-size: 400% 400%;
  animation: gradientAnimation 15s ease infinite;
}

@keyframes gradientAnimation {
  0% { background-position: 0% 50%; }
  50% { background-position: 100% 50%; }
  100% { background-position: 0% 50%; }
}

/* Layout */
.app { display: flex; min-height: 100vh; }

aside {
  width: 260px;
  flex-shrink: 0;
  padding: 0 20px;
  background: var(--panel);
  border-right: 2px solid var(--accent-soft);
}

.sidebar-title {
  text-align: center;
  padding: 2rem 0;
  margin-bottom: 2rem;
  border-bottom: 2px solid var(--accent-soft);
}

.sidebar-title h1 {
  font-size: 2rem;
  text-transform: uppercase;
  letter-spacing: 2px;
}

.sidebar-image { width: 100%; border-radius: var(--radius); margin-bottom: 1rem; }

main { flex: 1; padding: 32px 48px; max-width: 1200px; }

.title-text {
  font-size: 2.8rem;
  text-align: center;
  margin-bottom: 2rem;
  text-shadow: 0 0 10px var(--accent), 0 0 20px var(--accent);
}

h3 { margin: 1.5rem 0 0.5rem; font-size: 1.4rem; }
h4 { margin-bottom: 1rem; }
.muted { color: rgba(0, 212, 255, 0.7); margin-bottom: 1rem; font-family: 'Segoe UI', sans-serif; }

/* Buttons */
.nav-btn, .model-btn {
  display: block;
  width: 100%;
  margin: 10px 0;
  padding: 15px 25px;
  color: var(--accent);
  background: transparent;
  border: 2px solid var(--accent-soft);
  border-radius: var(--radius);
  font-family: var(--font);
  font-size: 1.1rem;
  cursor: pointer;
  transition: all 0.3s ease;
}
.nav-btn:hover, .model-btn:hover {
  background: rgba(0, 212, 255, 0.2);
  border-color: rgba(0, 212, 255, 0.8);
  transform: translateX(5px);
}
.nav-btn.active, .model-btn.active {
  background: rgba(0, 212, 255, 0.15);
  border-color: var(--accent);
}

/* Metric cards */
.cards { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; }
.metric-card {
  background: var(--panel);
  padding: 20px;
  border-radius: var(--radius);
  border: 2px solid;
  text-align: center;
}
.metric-card h3 { margin: 0 0 10px; font-size: 1.1rem; }
.metric-card p { font-size: 1.5rem; font-weight: bold; }

.best-panel {
  margin-top: 20px;
  padding: 20px;
  border: 2px solid;
  border-radius: var(--radius);
  text-align: center;
}
.best-panel h3 { font-size: 1.8rem; margin-top: 0; }

/* Comparison multi-select */
.multiselect { display: flex; flex-wrap: wrap; gap: 10px; margin-bottom: 1rem; }
.chip {
  display: inline-flex;
  align-items: center;
  gap: 8px;
  padding: 8px 14px;
  border: 2px solid var(--chip, var(--accent-soft));
  border-radius: 999px;
  background: var(--panel);
  cursor: pointer;
}
.chip input { accent-color: var(--chip); }

.empty {
  padding: 24px;
  text-align: center;
  border: 2px dashed var(--accent-soft);
  border-radius: var(--radius);
}

/* Charts */
.chart-wrap { background: var(--panel); border-radius: var(--radius); padding: 12px; }
.chart { width: 100%; height: auto; display: block; }

/* Models view */
.models-grid { display: grid; grid-template-columns: 1fr 3fr; gap: 24px; }
.metrics-card {
  background: var(--panel);
  padding: 20px;
  border-radius: var(--radius);
  border: 2px solid var(--accent-soft);
  margin-top: 20px;
}
.metrics-card h3 { margin: 0 0 15px; }
.metrics-card p { margin-bottom: 10px; }
.metrics-card ul { padding-left: 20px; }

.error-banner {
  display: none;
  margin-bottom: 1rem;
  padding: 12px 16px;
  border: 2px solid #f85149;
  border-radius: var(--radius);
  color: #f85149;
}
.error-banner.show { display: block; }
</style>
</head>
<body>
<div class="app">
  <aside>
    <div class="sidebar-title"><h1 id="sidebar-title">HacoHolics</h1></div>
    <img id="sidebar-image" class="sidebar-image" alt="" hidden>
    <nav id="nav"></nav>
  </aside>
  <main>
    <h1 class="title-text" id="heading">AI/ML Malware Detection System</h1>
    <div class="error-banner" id="error"></div>
    <div id="content"></div>
  </main>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let comparison = [];

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {}, credentials: 'same-origin' };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

function showError(msg) {
  const el = document.getElementById('error');
  el.textContent = msg;
  el.className = 'error-banner' + (msg ? ' show' : '');
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
function apply(data) {
  const page = data.page;
  document.title = page.chrome.page_title;
  document.getElementById('sidebar-title').textContent = page.chrome.sidebar_title;
  document.getElementById('heading').textContent = page.chrome.heading;

  const img = document.getElementById('sidebar-image');
  if (page.chrome.image) {
    img.src = page.chrome.image;
    img.hidden = false;
  }

  document.getElementById('nav').innerHTML = data.nav_html;
  document.getElementById('content').innerHTML = data.body_html;

  if (page.body.kind === 'dashboard') {
    comparison = page.body.selected.slice();
  }
  showError('');
  bind();
}

async function send(path, body) {
  try {
    apply(await api('POST', path, body));
  } catch (e) {
    showError(e.message);
  }
}

function bind() {
  document.querySelectorAll('[data-view]').forEach(btn => {
    btn.addEventListener('click', () => send('/api/view', { view: btn.dataset.view }));
  });
  document.querySelectorAll('[data-model]').forEach(btn => {
    btn.addEventListener('click', () => send('/api/model', { model: btn.dataset.model }));
  });
  document.querySelectorAll('[data-compare]').forEach(box => {
    box.addEventListener('change', () => {
      const name = box.dataset.compare;
      // Keep click order: new picks go to the end
      comparison = comparison.filter(n => n !== name);
      if (box.checked) comparison.push(name);
      send('/api/comparison', { models: comparison });
    });
  });
}

// ---------------------------------------------------------------------------
// Boot
// ---------------------------------------------------------------------------
api('GET', '/api/page')
  .then(apply)
  .catch(e => showError(e.message));
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_targets_api_routes() {
        for route in ["/api/page", "/api/view", "/api/model", "/api/comparison"] {
            assert!(INDEX_HTML.contains(route), "missing {route}");
        }
    }

    #[test]
    fn frontend_binds_rendered_controls() {
        for attr in ["[data-view]", "[data-model]", "[data-compare]"] {
            assert!(INDEX_HTML.contains(attr), "missing {attr}");
        }
    }
}
