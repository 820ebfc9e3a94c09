//! Embedded single-page dashboard shell.
//!
//! Three `.page` panels (home, camera, writers) plus navigation links. The
//! script copies `/ui/state` into the page, forwards input changes and
//! fragment changes, and shows queued alerts. It holds no state of its own.

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Aravis</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #c9d1d9;
  --muted: #8b949e;
  --accent: #58a6ff;
  --danger: #f85149;
}
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
  background: var(--bg);
  color: var(--text);
  line-height: 1.5;
}
header {
  display: flex;
  align-items: center;
  gap: 24px;
  padding: 12px 24px;
  background: var(--surface);
  border-bottom: 1px solid var(--border);
}
header h1 { font-size: 18px; }
nav a {
  color: var(--muted);
  text-decoration: none;
  margin-right: 16px;
}
nav a:hover, nav a.active { color: var(--accent); }
main { padding: 24px; max-width: 1100px; }
.page { display: none; }
.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 16px;
  margin-bottom: 16px;
}
.card h2 { font-size: 15px; margin-bottom: 12px; color: var(--muted); }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid var(--border); }
th { color: var(--muted); font-weight: 500; width: 220px; }
td img { vertical-align: middle; }
input, select {
  background: var(--bg);
  color: var(--text);
  border: 1px solid var(--border);
  border-radius: 4px;
  padding: 4px 8px;
}
button {
  background: var(--accent);
  color: var(--bg);
  border: none;
  border-radius: 4px;
  padding: 6px 14px;
  cursor: pointer;
  margin-right: 8px;
}
button.stop { background: var(--danger); }
#health { font-size: 12px; color: var(--danger); margin-left: auto; }
</style>
</head>
<body>
<header>
  <h1>Aravis</h1>
  <nav>
    <a href="#home-view">Home</a>
    <a href="#aravis-view">Camera</a>
    <a href="#fp-view">Writers</a>
  </nav>
  <span id="health"></span>
</header>
<main>

<section class="page home-view">
  <div class="card">
    <h2>Control server</h2>
    <table>
      <tr><th>API version</th><td id="api-version"></td></tr>
      <tr><th>Adapters</th><td id="api-adapters"></td></tr>
      <tr><th>odin-control version</th><td id="odin-version"></td></tr>
      <tr><th>Up time</th><td id="server-up-time"></td></tr>
    </table>
  </div>
  <div class="card">
    <h2>Platform</h2>
    <table>
      <tr><th>System</th><td id="system-type"></td></tr>
      <tr><th>Processor</th><td id="processor-type"></td></tr>
      <tr><th>Release</th><td id="system-release"></td></tr>
      <tr><th>Version</th><td id="system-version"></td></tr>
      <tr><th>Python</th><td id="python-version"></td></tr>
      <tr><th>Tornado</th><td id="tornado-version"></td></tr>
    </table>
  </div>
</section>

<section class="page aravis-view">
  <div class="card">
    <h2>Camera</h2>
    <table>
      <tr><th>Camera</th><td id="camera-id"></td><td></td></tr>
      <tr><th>Acquiring</th><td id="get-acq-state"></td><td></td></tr>
      <tr><th>Frames captured</th><td id="get-frames-captured"></td><td></td></tr>
      <tr><th>Pixel format</th><td id="get-pixel-format"></td><td></td></tr>
      <tr>
        <th>Exposure time</th><td id="get-exposure"></td>
        <td><input id="set-exposure" data-event="exposure_changed"></td>
      </tr>
      <tr><th>Frame rate</th><td id="get-rate"></td><td></td></tr>
      <tr>
        <th>Frame count</th><td id="get-num-frames"></td>
        <td><input id="set-num-frames" data-event="frame_count_changed"></td>
      </tr>
      <tr>
        <th>Mode</th><td id="get-mode"></td>
        <td>
          <select id="set-mode">
            <option value="0">SingleFrame</option>
            <option value="1">MultiFrame</option>
            <option value="2">Continuous</option>
          </select>
        </td>
      </tr>
    </table>
  </div>
  <div class="card">
    <button id="start-acquisition">Start</button>
    <button id="stop-acquisition" class="stop">Stop</button>
  </div>
</section>

<section class="page fp-view">
  <div class="card">
    <h2>Writers</h2>
    <table id="fp-table">
      <tr>
        <th>Writer</th><th>Connected</th><th>Shared memory</th><th>Processes</th>
        <th>Rank</th><th>Written</th><th>File</th><th>Writing</th>
      </tr>
    </table>
  </div>
  <div class="card">
    <h2>Capture</h2>
    <table>
      <tr><th>Frames</th><td><input id="set-fp-frames" class="fp-param"></td></tr>
      <tr><th>Path</th><td><input id="set-fp-path" class="fp-param"></td></tr>
      <tr><th>File name</th><td><input id="set-fp-filename" class="fp-param"></td></tr>
    </table>
    <p style="margin-top: 12px">
      <button id="fp-start-cmd">Start writing</button>
      <button id="fp-stop-cmd" class="stop">Stop writing</button>
    </p>
  </div>
</section>

</main>

<script>
const FP_FIELDS = ['connected', 'shared-mem', 'hdf-processes', 'hdf-rank',
                   'hdf-written', 'hdf-file-path', 'writing'];

function $(id) { return document.getElementById(id); }

async function post(path, body) {
  const res = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  return res.json();
}

// Writer rows appear as the server reports writers.
function ensureWriterRow(id) {
  const m = /^fp(\d+)-/.exec(id);
  if (!m || $('fp' + m[1] + '-row')) return;
  const row = document.createElement('tr');
  row.id = 'fp' + m[1] + '-row';
  row.innerHTML = '<td>fp' + m[1] + '</td>' +
    FP_FIELDS.map(f => '<td id="fp' + m[1] + '-' + f + '"></td>').join('');
  $('fp-table').appendChild(row);
}

async function refresh() {
  let state;
  try {
    state = await (await fetch('/ui/state')).json();
  } catch (e) {
    $('health').textContent = 'dashboard unreachable';
    return;
  }
  const doc = state.document;
  document.title = doc.title;

  for (const [id, html] of Object.entries(doc.elements)) {
    ensureWriterRow(id);
    const el = $(id);
    if (el && el.innerHTML !== html) el.innerHTML = html;
  }
  for (const [id, value] of Object.entries(doc.values)) {
    const el = $(id);
    if (el && el !== document.activeElement) el.value = value;
  }
  for (const panel of doc.panels) {
    document.querySelectorAll('.page.' + panel.class)
      .forEach(el => el.style.display = panel.visible ? 'block' : 'none');
  }
  document.querySelectorAll('nav a').forEach(a =>
    a.classList.toggle('active', a.getAttribute('href') === '#' + state.current_page));

  const failing = Object.entries(state.health)
    .filter(([, h]) => h.consecutive_failures > 0)
    .map(([name]) => name);
  $('health').textContent = failing.length ? 'not responding: ' + failing.join(', ') : '';

  if (state.alerts_pending > 0) showAlerts();
}

async function showAlerts() {
  const res = await (await fetch('/ui/alerts')).json();
  for (const msg of res.alerts) alert(msg);
}

async function send(event) {
  const res = await post('/ui/event', event);
  if (res.error) console.warn(res.error);
  showAlerts();
}

async function route() {
  await post('/ui/route', { fragment: decodeURIComponent(location.hash) });
  refresh();
}

document.querySelectorAll('input[data-event]').forEach(el =>
  el.addEventListener('change', () => send({ event: el.dataset.event, value: el.value })));

$('set-mode').addEventListener('change', e =>
  send({ event: 'mode_selected', index: Number(e.target.value) }));

$('start-acquisition').addEventListener('click', () => send({ event: 'start_acquisition' }));
$('stop-acquisition').addEventListener('click', () => send({ event: 'stop_acquisition' }));

document.querySelectorAll('.fp-param').forEach(el =>
  el.addEventListener('change', () => send({
    event: 'writer_params_changed',
    frames: $('set-fp-frames').value,
    path: $('set-fp-path').value,
    file_name: $('set-fp-filename').value,
  })));

$('fp-start-cmd').addEventListener('click', () => send({ event: 'writer_start' }));
$('fp-stop-cmd').addEventListener('click', () => send({ event: 'writer_stop' }));

window.addEventListener('hashchange', route);
route();
setInterval(refresh, 200);
</script>
</body>
</html>
"##;
