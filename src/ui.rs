use crate::models::{ExplorerRecord, LeaderboardRow, PoolState, SummaryResponse};

pub fn render_index(summary: &SummaryResponse) -> String {
    let pool_class = match summary.community.state {
        PoolState::WithinTarget => "pool-ok",
        PoolState::OverTarget => "pool-over",
    };
    let connected = summary.wallet_display.is_some();
    let last = summary.last_transaction.as_ref();

    fill(
        INDEX_HTML,
        &[
            ("WALLET", summary.wallet_display.as_deref().map(escape_html).unwrap_or_default()),
            ("WALLET_CLASS", hidden_unless(connected).trim().to_string()),
            ("CONNECT_CLASS", hidden_unless(!connected).trim().to_string()),
            ("TOTALS_CLASS", hidden_unless(summary.total_liters > 0).to_string()),
            ("TOTAL", summary.total_liters.to_string()),
            ("STREAK", summary.streak.to_string()),
            ("IMPACT", escape_html(&summary.impact.sentence)),
            ("BADGES", badges_html(&summary.badges)),
            ("LAST_CLASS", hidden_unless(last.is_some()).to_string()),
            ("LAST_HASH", last.map(|tx| escape_html(&tx.tx_hash)).unwrap_or_default()),
            ("LAST_LITERS", last.map(|tx| tx.liters.to_string()).unwrap_or_default()),
            ("LAST_WALLET", last.map(|tx| escape_html(&tx.wallet)).unwrap_or_default()),
            ("LAST_TIME", last.map(|tx| escape_html(&tx.timestamp)).unwrap_or_default()),
            ("LAST_LINK", last.map(|tx| escape_html(&tx.explorer_url)).unwrap_or_else(|| "#".into())),
            ("LAST_QR", last.and_then(|tx| tx.qr_svg.clone()).unwrap_or_default()),
            ("TREND_CLASS", hidden_unless(!summary.trend.is_empty()).to_string()),
            ("TANK_PCT", format!("{:.0}", summary.tank_percent)),
            ("POOL_PCT", format!("{:.0}", summary.community.percent)),
            ("POOL_CLASS", pool_class.to_string()),
            ("POOL_LITERS", summary.community.liters.to_string()),
            ("POOL_TARGET", summary.community.target.to_string()),
            ("LEADERBOARD", leaderboard_html(&summary.leaderboard)),
        ],
    )
}

pub fn render_explorer(record: &ExplorerRecord) -> String {
    fill(
        EXPLORER_HTML,
        &[
            ("TX_HASH", escape_html(&record.tx_hash)),
            ("LITERS", record.liters.to_string()),
            ("TIMESTAMP", escape_html(&record.timestamp)),
            ("STATUS", escape_html(&record.status)),
        ],
    )
}

/// Substitutes `{{KEY}}` placeholders in one pass. Substituted text is never
/// rescanned, so values may contain braces. Unknown keys are left as-is.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn hidden_unless(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn badges_html(badges: &[String]) -> String {
    badges
        .iter()
        .map(|badge| format!(r#"<span class="badge">{}</span>"#, escape_html(badge)))
        .collect()
}

fn leaderboard_html(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                "<li><span>{}. {}</span><span>{} L</span></li>",
                i + 1,
                escape_html(&row.name),
                row.usage
            )
        })
        .collect()
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const EXPLORER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>MockScan Explorer</title>
  <style>
    body {
      font-family: Arial, sans-serif;
      padding: 2rem;
      color: #1e293b;
    }

    .record {
      margin-top: 1rem;
      padding: 1rem;
      border: 1px solid #ddd;
      border-radius: 8px;
      max-width: 640px;
    }

    .record p {
      margin: 0.4rem 0;
      word-break: break-all;
    }
  </style>
</head>
<body>
  <h1>MockScan Explorer</h1>
  <div class="record">
    <p><strong>Tx Hash:</strong> <span id="tx-hash">{{TX_HASH}}</span></p>
    <p><strong>Water Used:</strong> <span id="liters">{{LITERS}}</span> L</p>
    <p><strong>Timestamp:</strong> <span id="timestamp">{{TIMESTAMP}}</span></p>
    <p><strong>Status:</strong> <span id="status">{{STATUS}}</span></p>
  </div>
  <p><a href="/">Back to AquaTrack</a></p>
</body>
</html>
"#;

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>AquaTrack</title>
  <style>
    :root {
      --bg-1: #eff6ff;
      --bg-2: #bfdbfe;
      --ink: #1e293b;
      --accent: #2563eb;
      --accent-2: #1e40af;
      --ok: #22c55e;
      --over: #ef4444;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(30, 64, 175, 0.15);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      padding: 40px 16px;
      display: grid;
      gap: 28px;
    }

    .hero {
      background: linear-gradient(90deg, var(--accent-2), var(--accent));
      color: white;
      padding: 40px;
      border-radius: 20px;
      text-align: center;
      box-shadow: var(--shadow);
    }

    .hero h1 {
      font-size: clamp(2.2rem, 5vw, 3rem);
      margin: 0 0 12px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      padding: 28px;
      box-shadow: var(--shadow);
      text-align: center;
    }

    .card h2,
    .card h3 {
      margin-top: 0;
      color: var(--accent-2);
    }

    .steps {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .step {
      background: var(--bg-1);
      border-radius: 14px;
      padding: 20px;
    }

    .hidden {
      display: none;
    }

    .total {
      font-size: 2.4rem;
      font-weight: 700;
      color: var(--accent-2);
      margin: 0;
    }

    .impact {
      color: #15803d;
      font-weight: 600;
    }

    .badges {
      display: flex;
      justify-content: center;
      gap: 12px;
      flex-wrap: wrap;
    }

    .badge {
      padding: 4px 12px;
      background: #dbeafe;
      border-radius: 999px;
      color: var(--accent);
      font-weight: 700;
    }

    .log-form {
      display: flex;
    }

    .log-form input {
      flex: 1;
      border: 1px solid #cbd5e1;
      border-radius: 10px 0 0 10px;
      padding: 10px 12px;
      font-size: 1rem;
    }

    button {
      border: none;
      background: var(--accent);
      color: white;
      padding: 10px 24px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      border-radius: 10px;
    }

    .log-form button {
      border-radius: 0 10px 10px 0;
    }

    .muted {
      color: #64748b;
      word-break: break-all;
    }

    #chart {
      width: 100%;
      height: 260px;
    }

    .chart-line {
      fill: none;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-point {
      fill: white;
      stroke: var(--accent);
      stroke-width: 2;
    }

    .chart-grid {
      stroke: #e2e8f0;
      stroke-dasharray: 3 3;
    }

    .chart-label {
      fill: #64748b;
      font-size: 11px;
    }

    .tank {
      position: relative;
      width: 128px;
      height: 192px;
      margin: 0 auto;
      border: 4px solid var(--accent);
      border-top: none;
      border-radius: 0 0 14px 14px;
      overflow: hidden;
      background: #dbeafe;
    }

    .tank-fill {
      position: absolute;
      bottom: 0;
      left: 0;
      width: 100%;
      background: #60a5fa;
      transition: height 700ms ease-in-out;
    }

    .tank-label {
      position: absolute;
      inset: 0;
      display: flex;
      align-items: center;
      justify-content: center;
      color: white;
      font-weight: 700;
      text-shadow: 0 1px 2px rgba(0, 0, 0, 0.4);
    }

    .pool-track {
      background: #e5e7eb;
      border-radius: 999px;
      height: 24px;
    }

    .pool-bar {
      height: 24px;
      border-radius: 999px;
      transition: width 400ms ease;
    }

    .pool-ok {
      background: var(--ok);
    }

    .pool-over {
      background: var(--over);
    }

    .qr {
      display: flex;
      justify-content: center;
      margin: 12px 0;
    }

    .leaderboard {
      list-style: none;
      padding: 0;
      margin: 0;
      display: grid;
      gap: 8px;
    }

    .leaderboard li {
      display: flex;
      justify-content: space-between;
      background: var(--bg-1);
      border-radius: 10px;
      padding: 8px 14px;
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="app">
    <section class="hero">
      <h1>AquaTrack</h1>
      <p>Log water usage, connect your wallet, and build <strong>transparent sustainability records</strong>.</p>
    </section>

    <section class="card">
      <p id="wallet-connected" class="{{WALLET_CLASS}}"><strong>Connected: <span id="wallet">{{WALLET}}</span></strong></p>
      <button id="connect-btn" class="{{CONNECT_CLASS}}" type="button">Connect Wallet</button>
    </section>

    <section class="card">
      <h2>How It Works</h2>
      <div class="steps">
        <div class="step"><h3>1. Log</h3><p>Enter your daily usage in liters.</p></div>
        <div class="step"><h3>2. QR</h3><p>Every log gets a verifiable record.</p></div>
        <div class="step"><h3>3. Share</h3><p>Share the record link for transparency &amp; trust.</p></div>
      </div>
    </section>

    <section class="card{{TOTALS_CLASS}}" id="totals-card">
      <h3>Total Water Logged</h3>
      <p class="total"><span id="total">{{TOTAL}}</span> L</p>
      <p class="impact" id="impact">{{IMPACT}}</p>
      <p class="muted">Streak: <span id="streak">{{STREAK}}</span> day(s)</p>
      <div class="badges" id="badges">{{BADGES}}</div>
    </section>

    <section class="card">
      <h2>Log Your Usage</h2>
      <form class="log-form" id="log-form" method="post" action="/log">
        <input id="liters" name="liters" type="number" min="0" step="1" placeholder="Enter liters used" />
        <button type="submit">Log</button>
      </form>
    </section>

    <section class="card{{LAST_CLASS}}" id="last-tx">
      <h3>Last Transaction</h3>
      <p class="muted">Tx Hash: <span id="last-hash">{{LAST_HASH}}</span></p>
      <p class="muted">Liters: <span id="last-liters">{{LAST_LITERS}}</span></p>
      <p class="muted">Wallet: <span id="last-wallet">{{LAST_WALLET}}</span></p>
      <p class="muted">Time: <span id="last-time">{{LAST_TIME}}</span></p>
      <div class="qr" id="last-qr">{{LAST_QR}}</div>
      <p><a id="last-link" href="{{LAST_LINK}}">View on MockScan</a></p>
    </section>

    <section class="card{{TREND_CLASS}}" id="trend-card">
      <h3>Usage Trend</h3>
      <svg id="chart" viewBox="0 0 600 260" aria-label="Usage trend" role="img"></svg>
    </section>

    <section class="card">
      <h3>Water Tank</h3>
      <div class="tank">
        <div class="tank-fill" id="tank-fill" style="height: {{TANK_PCT}}%"></div>
        <p class="tank-label"><span id="tank-pct">{{TANK_PCT}}</span>%</p>
      </div>
      <p><span id="tank-liters">{{TOTAL}}</span> L logged</p>
    </section>

    <section class="card">
      <h3>Community Water Pool</h3>
      <div class="pool-track">
        <div class="pool-bar {{POOL_CLASS}}" id="pool-bar" style="width: {{POOL_PCT}}%"></div>
      </div>
      <p class="muted"><span id="pool-liters">{{POOL_LITERS}}</span> / <span id="pool-target">{{POOL_TARGET}}</span> L used</p>
    </section>

    <section class="card">
      <h3>Leaderboard</h3>
      <ul class="leaderboard" id="leaderboard">{{LEADERBOARD}}</ul>
    </section>
  </main>

  <script>
    const el = (id) => document.getElementById(id);
    const connectBtn = el('connect-btn');
    const logForm = el('log-form');
    const litersInput = el('liters');

    const fail = async (res, fallback) => {
      const msg = await res.text();
      throw new Error(msg || fallback);
    };

    const renderChart = (points) => {
      const chart = el('chart');
      const width = 600;
      const height = 260;
      const padX = 44;
      const padY = 30;
      const max = Math.max(1, ...points.map((p) => p.liters));
      const step = points.length > 1 ? (width - padX * 2) / (points.length - 1) : 0;
      const x = (i) => padX + i * step;
      const y = (v) => height - padY - (v / max) * (height - padY * 2);

      let grid = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        grid += `<line class="chart-grid" x1="${padX}" y1="${y(value)}" x2="${width - padX}" y2="${y(value)}" />`;
        grid += `<text class="chart-label" x="${padX - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value)}</text>`;
      }
      const path = points.map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(p.liters)}`).join(' ');
      const dots = points.map((p, i) => `<circle class="chart-point" cx="${x(i)}" cy="${y(p.liters)}" r="4" />`).join('');
      const labels = points
        .map((p, i) => `<text class="chart-label" x="${x(i)}" y="${height - padY + 16}" text-anchor="middle">${p.id}</text>`)
        .join('');
      chart.innerHTML = `${grid}<path class="chart-line" d="${path}" />${dots}${labels}`;
    };

    const render = (s) => {
      if (s.wallet_display) {
        el('wallet').textContent = s.wallet_display;
        el('wallet-connected').classList.remove('hidden');
        connectBtn.classList.add('hidden');
      }

      el('totals-card').classList.toggle('hidden', s.total_liters === 0);
      el('total').textContent = s.total_liters;
      el('impact').textContent = s.impact.sentence;
      el('streak').textContent = s.streak;
      el('badges').innerHTML = '';
      s.badges.forEach((badge) => {
        const span = document.createElement('span');
        span.className = 'badge';
        span.textContent = badge;
        el('badges').appendChild(span);
      });

      const last = s.last_transaction;
      el('last-tx').classList.toggle('hidden', !last);
      if (last) {
        el('last-hash').textContent = last.tx_hash;
        el('last-liters').textContent = last.liters;
        el('last-wallet').textContent = last.wallet;
        el('last-time').textContent = last.timestamp;
        el('last-link').href = last.explorer_url;
        el('last-qr').innerHTML = last.qr_svg || '';
      }

      el('trend-card').classList.toggle('hidden', s.trend.length === 0);
      if (s.trend.length) {
        renderChart(s.trend);
      }

      el('tank-fill').style.height = `${s.tank_percent}%`;
      el('tank-pct').textContent = s.tank_percent.toFixed(0);
      el('tank-liters').textContent = s.total_liters;

      const bar = el('pool-bar');
      bar.style.width = `${s.community.percent}%`;
      bar.className = `pool-bar ${s.community.state === 'over_target' ? 'pool-over' : 'pool-ok'}`;
      el('pool-liters').textContent = s.community.liters;
      el('pool-target').textContent = s.community.target;

      el('leaderboard').innerHTML = '';
      s.leaderboard.forEach((row, i) => {
        const li = document.createElement('li');
        const name = document.createElement('span');
        const usage = document.createElement('span');
        name.textContent = `${i + 1}. ${row.name}`;
        usage.textContent = `${row.usage} L`;
        li.append(name, usage);
        el('leaderboard').appendChild(li);
      });
    };

    const refresh = async () => {
      const res = await fetch('/api/summary');
      if (!res.ok) {
        await fail(res, 'Unable to load summary');
      }
      render(await res.json());
    };

    const requestAccounts = async () => {
      if (!window.ethereum) {
        return {};
      }
      try {
        const accounts = await window.ethereum.request({ method: 'eth_requestAccounts' });
        return { accounts };
      } catch (err) {
        return { error: err && err.message ? err.message : String(err) };
      }
    };

    connectBtn.addEventListener('click', async () => {
      const outcome = await requestAccounts();
      const res = await fetch('/api/wallet/connect', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(outcome)
      });
      if (!res.ok) {
        const msg = await res.text();
        if (!outcome.accounts && !outcome.error) {
          alert(msg);
        } else {
          console.error('Wallet connection failed:', msg);
        }
        return;
      }
      await refresh();
    });

    logForm.addEventListener('submit', async (event) => {
      event.preventDefault();
      const res = await fetch('/api/logs', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ liters: litersInput.value })
      });
      if (!res.ok) {
        alert(await res.text());
        return;
      }
      litersInput.value = '';
      await refresh();
    });

    refresh().catch((err) => console.error(err));
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::explorer::lookup;
    use crate::session::Session;
    use crate::stats::build_summary;
    use std::time::Instant;

    fn logged_session(amounts: &[&str]) -> Session {
        let mut session = Session::new(Instant::now());
        session.wallet = Some("0x52908400098527886E0F7030069857D2E4169EE7".into());
        for amount in amounts {
            session
                .ledger
                .append(Some(amount), session.wallet.as_deref())
                .unwrap();
        }
        session
    }

    #[test]
    fn explorer_page_escapes_hash() {
        let html = render_explorer(&lookup("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
        assert!(html.contains("Confirmed"));
    }

    #[test]
    fn index_fills_every_placeholder() {
        let html = render_index(&build_summary(None, &AppConfig::default()));
        assert!(!html.contains("{{"));
        assert!(html.contains("2000"));
        assert!(html.contains("pool-ok"));
    }

    #[test]
    fn empty_ledger_hides_totals_and_last_transaction() {
        let html = render_index(&build_summary(None, &AppConfig::default()));
        assert!(html.contains(r#"<section class="card hidden" id="totals-card">"#));
        assert!(html.contains(r#"<section class="card hidden" id="last-tx">"#));
        assert!(html.contains(r#"<section class="card hidden" id="trend-card">"#));
        assert!(html.contains(r#"<p id="wallet-connected" class="hidden">"#));
        assert!(html.contains("<li><span>1. You</span><span>0 L</span></li>"));
    }

    #[test]
    fn logged_usage_is_rendered_server_side() {
        let session = logged_session(&["50"]);
        let summary = build_summary(Some(&session), &AppConfig::default());
        let html = render_index(&summary);
        let last = summary.last_transaction.as_ref().unwrap();

        assert!(html.contains(r#"<section class="card" id="totals-card">"#));
        assert!(html.contains(r#"<span class="badge">Water Saver</span>"#));
        assert!(html.contains("50L = enough for 5 plants"));
        assert!(html.contains(&format!(r#"<span id="last-hash">{}</span>"#, last.tx_hash)));
        assert!(html.contains(&format!(r#"href="/explorer/{}""#, last.tx_hash)));
        assert!(html.contains("<svg"));
        assert!(html.contains("<li><span>1. 0x5290...9EE7</span><span>50 L</span></li>"));
        assert!(html.contains(r#"<button id="connect-btn" class="hidden""#));
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let html = render_explorer(&lookup("{{LITERS}}"));
        assert!(html.contains(r#"<span id="tx-hash">{{LITERS}}</span>"#));

        let filled = fill("{{A}}-{{B}}-{{C}}", &[("A", "{{B}}".into()), ("B", "x".into())]);
        assert_eq!(filled, "{{B}}-x-{{C}}");
        assert_eq!(fill("open {{A", &[("A", "x".into())]), "open {{A");
    }
}
