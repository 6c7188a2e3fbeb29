use std::fmt::Write;

use crate::filters::Zone;
use crate::models::{
    AttendanceDashboard, CharacterizationOverview, CharacterizationZoneSummary, KeyCount, Monitor,
};

pub fn render_sign_in(error: Option<&str>) -> String {
    let error_html = match error {
        Some(message) => format!("<div class=\"form-error\">{}</div>", escape(message)),
        None => String::new(),
    };
    SIGN_IN_HTML.replace("{{ERROR}}", &error_html)
}

pub fn render_dashboard(dashboard: &AttendanceDashboard, username: &str) -> String {
    let filters = &dashboard.filters;
    let chart_data = serde_json::to_string(&dashboard.venue_daily_averages)
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c");

    let total_users = match dashboard.total_users {
        Some(count) => count.to_string(),
        None => "&mdash;".to_string(),
    };

    let mut rows = String::new();
    for record in &dashboard.rows {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            record.attendance_date,
            escape(&record.instructor_name),
            escape(&record.venue),
            escape(&record.neighborhood),
            escape(&record.activity_type),
            escape(&record.administrative_area),
        );
    }
    let listing = if dashboard.rows.is_empty() {
        "<p class=\"empty\">No attendance records match the current filters.</p>".to_string()
    } else {
        format!(
            "<div class=\"table-wrap\"><table>\
             <thead><tr><th>Date</th><th>Instructor</th><th>Venue</th><th>Neighborhood</th>\
             <th>Activity</th><th>Area</th></tr></thead><tbody>{rows}</tbody></table></div>"
        )
    };

    let content = DASHBOARD_HTML
        .replace("{{ZONE_OPTIONS}}", &zone_options(filters.zone))
        .replace(
            "{{AREA_OPTIONS}}",
            &select_options(&dashboard.administrative_areas, &filters.administrative_area),
        )
        .replace(
            "{{NEIGHBORHOOD_OPTIONS}}",
            &select_options(&dashboard.neighborhoods, &filters.neighborhood),
        )
        .replace(
            "{{VENUE_OPTIONS}}",
            &select_options(&dashboard.venues, &filters.venue),
        )
        .replace(
            "{{ACTIVITY_OPTIONS}}",
            &select_options(&dashboard.activity_types, &filters.activity_type),
        )
        .replace("{{FROM}}", &filters.date_from.to_string())
        .replace("{{TO}}", &filters.date_to.to_string())
        .replace("{{TOTAL_USERS}}", &total_users)
        .replace("{{TOTAL_FILTERED}}", &dashboard.total_filtered.to_string())
        .replace("{{DISTINCT_VENUES}}", &dashboard.distinct_venues.to_string())
        .replace("{{BY_VENUE}}", &count_rows(&dashboard.by_venue))
        .replace("{{BY_INSTRUCTOR}}", &count_rows(&dashboard.by_instructor))
        .replace("{{LISTING}}", &listing)
        .replace("{{CHART_DATA}}", &chart_data);

    render_page("Attendance", username, "/home", content)
}

pub fn render_monitors(
    all: &[Monitor],
    filtered: &[&Monitor],
    search: &str,
    username: &str,
) -> String {
    let mut rows = String::new();
    for (index, monitor) in filtered.iter().enumerate() {
        let id = escape(&monitor.user_id);
        let _ = write!(
            rows,
            "<tr><td>{n}</td><td>{name}</td><td><span class=\"badge\">{doc}</span></td>\
             <td><button type=\"button\" class=\"detail-btn\" data-monitor=\"{id}\">Detail</button></td></tr>\
             <tr class=\"detail-row\" id=\"detail-{id}\" hidden><td colspan=\"4\">Loading&hellip;</td></tr>",
            n = index + 1,
            name = escape(monitor.first_name.trim()),
            doc = escape(&monitor.document_number),
        );
    }
    let listing = if filtered.is_empty() {
        let message = if search.is_empty() {
            "No monitors registered."
        } else {
            "No monitors match that search."
        };
        format!("<p class=\"empty\">{message}</p>")
    } else {
        format!(
            "<div class=\"table-wrap\"><table>\
             <thead><tr><th>#</th><th>Name</th><th>Document</th><th></th></tr></thead>\
             <tbody>{rows}</tbody></table></div>"
        )
    };

    let content = MONITORS_HTML
        .replace("{{SEARCH}}", &escape(search))
        .replace("{{TOTAL}}", &all.len().to_string())
        .replace("{{FILTERED}}", &filtered.len().to_string())
        .replace("{{LISTING}}", &listing);

    render_page("Monitors", username, "/monitors", content)
}

pub fn render_characterization(
    zones: &[CharacterizationZoneSummary],
    overview: &CharacterizationOverview,
    zone_filter: &str,
    search: &str,
    username: &str,
) -> String {
    let mut rows = String::new();
    for zone in zones {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{:.1}</td><td class=\"num\">{:.2}</td>\
             <td class=\"num\">{:.1}</td><td class=\"num\">{:.2}</td><td class=\"num\">{:.1}</td>\
             <td class=\"num\">{}</td></tr>",
            escape(&zone.group_name),
            escape(&zone.zone),
            zone.avg_weight,
            zone.avg_height,
            zone.avg_bmi,
            zone.avg_waist_hip_ratio,
            zone.avg_body_fat,
            zone.records_in_zone,
        );
    }
    let listing = if zones.is_empty() {
        "<p class=\"empty\">No zones match the current filters.</p>".to_string()
    } else {
        format!(
            "<div class=\"table-wrap\"><table>\
             <thead><tr><th>Group</th><th>Zone</th><th>Weight</th><th>Height</th><th>BMI</th>\
             <th>WHR</th><th>Body fat</th><th>Records</th></tr></thead><tbody>{rows}</tbody>\
             </table></div>"
        )
    };

    let selected = |value: &str| if zone_filter == value { " selected" } else { "" };
    let zone_select = format!(
        "<option value=\"all\">All zones</option>\
         <option value=\"urbana\"{u}>Urban</option>\
         <option value=\"rural\"{r}>Rural</option>",
        u = selected("urbana"),
        r = selected("rural"),
    );

    let content = CHARACTERIZATION_HTML
        .replace("{{ZONE_OPTIONS}}", &zone_select)
        .replace("{{SEARCH}}", &escape(search))
        .replace("{{ZONE_COUNT}}", &overview.zone_count.to_string())
        .replace("{{AVG_WEIGHT}}", &format!("{:.1}", overview.avg_weight))
        .replace("{{AVG_BMI}}", &format!("{:.1}", overview.avg_bmi))
        .replace("{{TOTAL_RECORDS}}", &overview.total_records.to_string())
        .replace("{{LISTING}}", &listing);

    render_page("Characterization", username, "/characterization", content)
}

pub fn render_reports(
    username: &str,
    car_start: &str,
    car_end: &str,
    car_url: &str,
    gen_start: &str,
    gen_end: &str,
    gen_url: &str,
) -> String {
    let content = REPORTS_HTML
        .replace("{{CAR_START}}", &escape(car_start))
        .replace("{{CAR_END}}", &escape(car_end))
        .replace("{{CAR_URL}}", &escape(car_url))
        .replace("{{GEN_START}}", &escape(gen_start))
        .replace("{{GEN_END}}", &escape(gen_end))
        .replace("{{GEN_URL}}", &escape(gen_url));

    render_page("Reports", username, "/reports", content)
}

/// Inline error surface for a failed page fetch: plain-language message plus
/// a manual retry link. Never shows transport detail.
pub fn render_fetch_error(title: &str, retry_href: &str, message: &str) -> String {
    let content = format!(
        "<section class=\"card error-card\">\
         <h2>{}</h2>\
         <p class=\"form-error\">{}</p>\
         <a class=\"button\" href=\"{}\">Retry</a>\
         </section>",
        escape(title),
        escape(message),
        escape(retry_href),
    );
    render_page(title, "", retry_href, content)
}

fn render_page(title: &str, username: &str, active: &str, content: String) -> String {
    let who = if username.is_empty() {
        String::new()
    } else {
        format!(
            "<span class=\"who-name\">{}</span>\
             <form method=\"post\" action=\"/logout\"><button class=\"linklike\">Sign out</button></form>",
            escape(username)
        )
    };

    let mut nav = String::new();
    for (href, label) in [
        ("/home", "Attendance"),
        ("/monitors", "Monitors"),
        ("/characterization", "Characterization"),
        ("/reports", "Reports"),
    ] {
        let class = if href == active { " class=\"active\"" } else { "" };
        let _ = write!(nav, "<a href=\"{href}\"{class}>{label}</a>");
    }

    PAGE_SHELL
        .replace("{{TITLE}}", &escape(title))
        .replace("{{NAV}}", &nav)
        .replace("{{WHO}}", &who)
        .replace("{{CONTENT}}", &content)
}

fn zone_options(selected: Zone) -> String {
    let mut out = String::new();
    for (zone, label) in [
        (Zone::All, "All zones"),
        (Zone::Urban, "Urban"),
        (Zone::Rural, "Rural"),
    ] {
        let mark = if zone == selected { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{}\"{mark}>{label}</option>",
            zone.as_str()
        );
    }
    out
}

fn select_options(values: &[String], selected: &str) -> String {
    let mut out = String::from("<option value=\"\">All</option>");
    for value in values {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(
            out,
            "<option value=\"{v}\"{mark}>{v}</option>",
            v = escape(value)
        );
    }
    out
}

fn count_rows(counts: &[KeyCount]) -> String {
    if counts.is_empty() {
        return "<tr><td colspan=\"2\" class=\"empty\">No data</td></tr>".to_string();
    }
    let mut out = String::new();
    for entry in counts {
        let label = if entry.key.is_empty() {
            "(unspecified)".to_string()
        } else {
            escape(&entry.key)
        };
        let _ = write!(
            out,
            "<tr><td>{label}</td><td class=\"num\">{}</td></tr>",
            entry.count
        );
    }
    out
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}} | Fitness Panel</title>
  <style>
    :root {
      --bg: #f1f4f8;
      --ink: #1d2733;
      --muted: #5d6b7c;
      --line: #dbe2ea;
      --accent: #2563c7;
      --accent-soft: #e3ecfb;
      --good: #1f8a5a;
      --bad: #c0392b;
      --card: #ffffff;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
    }

    .topbar {
      display: flex;
      align-items: center;
      gap: 28px;
      padding: 14px 28px;
      background: var(--card);
      border-bottom: 1px solid var(--line);
    }

    .brand { font-weight: 700; letter-spacing: 0.02em; }

    .topbar nav { display: flex; gap: 4px; flex: 1; }

    .topbar nav a {
      padding: 8px 14px;
      border-radius: 8px;
      text-decoration: none;
      color: var(--muted);
      font-size: 0.95rem;
    }

    .topbar nav a.active { background: var(--accent-soft); color: var(--accent); }

    .who { display: flex; align-items: center; gap: 12px; }
    .who-name { color: var(--muted); font-size: 0.9rem; }

    .linklike {
      border: none;
      background: none;
      color: var(--accent);
      cursor: pointer;
      font-size: 0.9rem;
      padding: 0;
    }

    .content { padding: 24px 28px 48px; max-width: 1100px; margin: 0 auto; }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 20px;
      margin-bottom: 20px;
    }

    .card h2 { margin: 0 0 14px; font-size: 1.2rem; }
    .card h3 { margin: 0 0 10px; font-size: 1rem; }

    .filter-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(170px, 1fr));
      gap: 12px;
      align-items: end;
    }

    label { display: block; font-size: 0.8rem; color: var(--muted); margin-bottom: 4px; }

    select, input[type=date], input[type=text] {
      width: 100%;
      padding: 8px;
      border: 1px solid var(--line);
      border-radius: 8px;
      background: white;
      font-size: 0.9rem;
    }

    .button, button.primary {
      display: inline-block;
      padding: 9px 16px;
      background: var(--accent);
      border: none;
      border-radius: 8px;
      color: white;
      font-size: 0.9rem;
      text-decoration: none;
      cursor: pointer;
    }

    .button.secondary { background: var(--muted); }

    .tiles {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 12px;
      margin-bottom: 20px;
    }

    .tile {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 14px 16px;
    }

    .tile .label {
      display: block;
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .tile .value { display: block; font-size: 1.6rem; font-weight: 600; margin-top: 4px; }
    .tile .value.good { color: var(--good); }

    .table-wrap { overflow-x: auto; }

    table { width: 100%; border-collapse: collapse; font-size: 0.9rem; }
    th { text-align: left; color: var(--muted); font-weight: 600; font-size: 0.78rem; text-transform: uppercase; }
    th, td { padding: 8px 10px; border-bottom: 1px solid var(--line); }
    td.num { text-align: right; font-variant-numeric: tabular-nums; }

    .badge {
      background: var(--accent-soft);
      color: var(--accent);
      border-radius: 999px;
      padding: 3px 10px;
      font-size: 0.8rem;
    }

    .detail-btn {
      border: 1px solid var(--line);
      background: white;
      border-radius: 8px;
      padding: 5px 12px;
      cursor: pointer;
      font-size: 0.82rem;
    }

    .detail-row td { background: var(--accent-soft); font-size: 0.88rem; }

    .split { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
    @media (max-width: 760px) { .split { grid-template-columns: 1fr; } }

    #chart { width: 100%; height: 280px; display: block; }
    .chart-bar { fill: var(--accent); }
    .chart-label { fill: var(--muted); font-size: 11px; }
    .chart-value { fill: var(--ink); font-size: 11px; }

    .empty { color: var(--muted); padding: 18px 0; text-align: center; }
    .form-error { color: var(--bad); margin: 10px 0; }
    .status { color: var(--muted); font-size: 0.85rem; min-height: 1.2em; }
    .error-card { text-align: center; padding: 40px; }
  </style>
</head>
<body>
  <header class="topbar">
    <span class="brand">Fitness Panel</span>
    <nav>{{NAV}}</nav>
    <div class="who">{{WHO}}</div>
  </header>
  <main class="content">
{{CONTENT}}
  </main>
</body>
</html>
"#;

const SIGN_IN_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Sign in | Fitness Panel</title>
  <style>
    body {
      margin: 0;
      min-height: 100vh;
      display: grid;
      place-items: center;
      background: #f1f4f8;
      font-family: "Segoe UI", "Helvetica Neue", Arial, sans-serif;
      color: #1d2733;
    }
    .panel {
      width: min(380px, 92vw);
      background: white;
      border: 1px solid #dbe2ea;
      border-radius: 14px;
      padding: 32px;
    }
    h1 { margin: 0 0 4px; font-size: 1.4rem; }
    .hint { margin: 0 0 22px; color: #5d6b7c; font-size: 0.9rem; }
    label { display: block; font-size: 0.8rem; color: #5d6b7c; margin-bottom: 4px; }
    input {
      width: 100%;
      box-sizing: border-box;
      padding: 10px;
      margin-bottom: 16px;
      border: 1px solid #dbe2ea;
      border-radius: 8px;
      font-size: 0.95rem;
    }
    button {
      width: 100%;
      padding: 11px;
      background: #2563c7;
      color: white;
      border: none;
      border-radius: 8px;
      font-size: 0.95rem;
      cursor: pointer;
    }
    .form-error { color: #c0392b; font-size: 0.9rem; margin: 0 0 14px; text-align: center; }
  </style>
</head>
<body>
  <main class="panel">
    <h1>Sign in</h1>
    <p class="hint">Enter your staff username and password</p>
    {{ERROR}}
    <form method="post" action="/login">
      <label for="username">Username</label>
      <input id="username" name="username" placeholder="username or email" required />
      <label for="password">Password</label>
      <input id="password" name="password" type="password" placeholder="password" required />
      <button type="submit">Sign in</button>
    </form>
  </main>
</body>
</html>
"#;

const DASHBOARD_HTML: &str = r#"<section class="card">
  <h2>Attendance</h2>
  <form method="get" action="/home" class="filter-grid">
    <div>
      <label for="zone">Zone</label>
      <select id="zone" name="zone">{{ZONE_OPTIONS}}</select>
    </div>
    <div>
      <label for="area">Area</label>
      <select id="area" name="area">{{AREA_OPTIONS}}</select>
    </div>
    <div>
      <label for="neighborhood">Neighborhood</label>
      <select id="neighborhood" name="neighborhood">{{NEIGHBORHOOD_OPTIONS}}</select>
    </div>
    <div>
      <label for="venue">Venue</label>
      <select id="venue" name="venue">{{VENUE_OPTIONS}}</select>
    </div>
    <div>
      <label for="activity">Activity</label>
      <select id="activity" name="activity">{{ACTIVITY_OPTIONS}}</select>
    </div>
    <div>
      <label for="from">From</label>
      <input id="from" type="date" name="from" value="{{FROM}}" />
    </div>
    <div>
      <label for="to">To</label>
      <input id="to" type="date" name="to" value="{{TO}}" />
    </div>
    <div>
      <button class="primary" type="submit">Apply</button>
      <a class="button secondary" href="/home">Reset</a>
    </div>
  </form>
</section>

<div class="tiles">
  <div class="tile">
    <span class="label">Registered users</span>
    <span class="value">{{TOTAL_USERS}}</span>
  </div>
  <div class="tile">
    <span class="label">Filtered attendance</span>
    <span class="value good">{{TOTAL_FILTERED}}</span>
  </div>
  <div class="tile">
    <span class="label">Venues with attendance</span>
    <span class="value">{{DISTINCT_VENUES}}</span>
  </div>
  <div class="tile">
    <span class="label">Gender split</span>
    <span class="value" id="gender-value">&mdash;</span>
    <span class="status" id="gender-status"></span>
  </div>
</div>

<section class="card">
  <h2>Daily average attendance per venue</h2>
  <svg id="chart" viewBox="0 0 600 280" role="img" aria-label="Average attendance per venue"></svg>
</section>

<div class="split">
  <section class="card">
    <h3>Attendance by venue</h3>
    <table><tbody>{{BY_VENUE}}</tbody></table>
  </section>
  <section class="card">
    <h3>Attendance by instructor</h3>
    <table><tbody>{{BY_INSTRUCTOR}}</tbody></table>
  </section>
</div>

<section class="card">
  <h3>Records</h3>
  {{LISTING}}
</section>

<script id="chart-data" type="application/json">{{CHART_DATA}}</script>
<script>
  const range = { from: '{{FROM}}', to: '{{TO}}' };

  const renderBars = () => {
    const el = document.getElementById('chart-data');
    const svg = document.getElementById('chart');
    let points = [];
    try {
      points = JSON.parse(el.textContent);
    } catch (err) {
      points = [];
    }

    if (!points.length) {
      svg.innerHTML = '<text class=\'chart-label\' x=\'50%\' y=\'50%\' text-anchor=\'middle\'>No data for these filters</text>';
      return;
    }

    const width = 600;
    const height = 280;
    const padX = 30;
    const padBottom = 70;
    const padTop = 20;
    const max = Math.max(...points.map((p) => p.average), 1);
    const slot = (width - padX * 2) / points.length;
    const barWidth = Math.min(42, slot * 0.7);

    let markup = '';
    points.forEach((point, index) => {
      const h = ((height - padTop - padBottom) * point.average) / max;
      const x = padX + index * slot + (slot - barWidth) / 2;
      const y = height - padBottom - h;
      const cx = x + barWidth / 2;
      markup += '<rect class=\'chart-bar\' x=\'' + x.toFixed(1) + '\' y=\'' + y.toFixed(1) +
        '\' width=\'' + barWidth.toFixed(1) + '\' height=\'' + h.toFixed(1) + '\' rx=\'3\' />';
      markup += '<text class=\'chart-value\' x=\'' + cx.toFixed(1) + '\' y=\'' + (y - 5).toFixed(1) +
        '\' text-anchor=\'middle\'>' + point.average + '</text>';
      const label = point.venue.length > 14 ? point.venue.slice(0, 13) + '…' : point.venue;
      markup += '<text class=\'chart-label\' x=\'' + cx.toFixed(1) + '\' y=\'' + (height - padBottom + 12).toFixed(1) +
        '\' text-anchor=\'end\' transform=\'rotate(-45 ' + cx.toFixed(1) + ' ' + (height - padBottom + 12).toFixed(1) + ')\'>' +
        label.replace(/&/g, '&amp;').replace(/</g, '&lt;') + '</text>';
    });
    svg.innerHTML = markup;
  };

  const loadGender = async () => {
    const status = document.getElementById('gender-status');
    try {
      const res = await fetch('/api/attendance/gender?from=' + encodeURIComponent(range.from) +
        '&to=' + encodeURIComponent(range.to));
      if (res.status === 401) {
        window.location = '/';
        return;
      }
      if (!res.ok) {
        throw new Error('unavailable');
      }
      const data = await res.json();
      document.getElementById('gender-value').textContent =
        data.men_pct + '% M / ' + data.women_pct + '% F';
    } catch (err) {
      status.textContent = 'Gender split unavailable.';
    }
  };

  renderBars();
  loadGender();
</script>
"#;

const MONITORS_HTML: &str = r#"<section class="card">
  <h2>Monitors</h2>
  <form method="get" action="/monitors" class="filter-grid">
    <div>
      <label for="q">Search</label>
      <input id="q" type="text" name="q" value="{{SEARCH}}" placeholder="name or document" />
    </div>
    <div>
      <button class="primary" type="submit">Search</button>
      <a class="button secondary" href="/monitors">Clear</a>
    </div>
  </form>
</section>

<div class="tiles">
  <div class="tile">
    <span class="label">Total monitors</span>
    <span class="value">{{TOTAL}}</span>
  </div>
  <div class="tile">
    <span class="label">Matching search</span>
    <span class="value good">{{FILTERED}}</span>
  </div>
</div>

<section class="card">
  {{LISTING}}
</section>

<script>
  const sectionLine = (label, text) => '<strong>' + label + ':</strong> ' + text;

  const describe = (summary) => {
    const parts = [];
    if (summary.activity_stats) {
      parts.push(sectionLine('Activities', summary.activity_stats.total_actividades +
        ' held, ' + summary.activity_stats.total_asistentes + ' attendees'));
    } else {
      parts.push(sectionLine('Activities', 'unavailable'));
    }
    if (summary.cancelled) {
      parts.push(sectionLine('Cancelled', summary.cancelled.actividades_canceladas));
    } else {
      parts.push(sectionLine('Cancelled', 'unavailable'));
    }
    if (summary.rating) {
      parts.push(sectionLine('Average rating', summary.rating.calificacion_promedio));
    } else {
      parts.push(sectionLine('Average rating', 'unavailable'));
    }
    return parts.join(' &middot; ');
  };

  document.querySelectorAll('.detail-btn').forEach((button) => {
    button.addEventListener('click', async () => {
      const id = button.dataset.monitor;
      const row = document.getElementById('detail-' + id);
      row.hidden = !row.hidden;
      if (row.hidden || row.dataset.loaded) {
        return;
      }
      try {
        const res = await fetch('/api/monitors/' + encodeURIComponent(id) + '/summary');
        if (res.status === 401) {
          window.location = '/';
          return;
        }
        if (!res.ok) {
          throw new Error('unavailable');
        }
        row.cells[0].innerHTML = describe(await res.json());
        row.dataset.loaded = 'true';
      } catch (err) {
        row.cells[0].textContent = 'Detail unavailable right now.';
      }
    });
  });
</script>
"#;

const CHARACTERIZATION_HTML: &str = r#"<section class="card">
  <h2>Characterization by zone</h2>
  <form method="get" action="/characterization" class="filter-grid">
    <div>
      <label for="zone">Zone</label>
      <select id="zone" name="zone">{{ZONE_OPTIONS}}</select>
    </div>
    <div>
      <label for="q">Search group</label>
      <input id="q" type="text" name="q" value="{{SEARCH}}" placeholder="group name" />
    </div>
    <div>
      <button class="primary" type="submit">Apply</button>
      <a class="button secondary" href="/characterization">Clear</a>
    </div>
  </form>
</section>

<div class="tiles">
  <div class="tile">
    <span class="label">Zones shown</span>
    <span class="value">{{ZONE_COUNT}}</span>
  </div>
  <div class="tile">
    <span class="label">Avg weight (kg)</span>
    <span class="value">{{AVG_WEIGHT}}</span>
  </div>
  <div class="tile">
    <span class="label">Avg BMI</span>
    <span class="value">{{AVG_BMI}}</span>
  </div>
  <div class="tile">
    <span class="label">Records</span>
    <span class="value good">{{TOTAL_RECORDS}}</span>
  </div>
</div>

<section class="card">
  {{LISTING}}
</section>
"#;

const REPORTS_HTML: &str = r#"<div class="split">
  <section class="card">
    <h2>Characterization report</h2>
    <form method="get" action="/reports" class="filter-grid">
      <div>
        <label for="car_start">Start date</label>
        <input id="car_start" type="date" name="car_start" value="{{CAR_START}}" />
      </div>
      <div>
        <label for="car_end">End date</label>
        <input id="car_end" type="date" name="car_end" value="{{CAR_END}}" />
      </div>
      <div>
        <button class="primary" type="submit">Set range</button>
      </div>
    </form>
    <p><a class="button" href="{{CAR_URL}}" download>Download Excel</a></p>
  </section>

  <section class="card">
    <h2>General data report</h2>
    <form method="get" action="/reports" class="filter-grid">
      <div>
        <label for="gen_start">Start date</label>
        <input id="gen_start" type="date" name="gen_start" value="{{GEN_START}}" />
      </div>
      <div>
        <label for="gen_end">End date</label>
        <input id="gen_end" type="date" name="gen_end" value="{{GEN_END}}" />
      </div>
      <div>
        <button class="primary" type="submit">Set range</button>
      </div>
    </form>
    <p><a class="button" href="{{GEN_URL}}" download>Download Excel</a></p>
  </section>
</div>
"#;
