//! HTML rendering for the single page and the analyzer panel.

use crate::analysis::ScenarioAnalysis;
use crate::error::SERVICE_FAILURE_MESSAGE;
use crate::analyzer::AnalyzerState;
use crate::content::{
    ADOPTION_STEPS, DISCLAIMER, GUIDELINES_HEADING, INCIDENT_CASES, INDUSTRY_HIGHLIGHTS,
    INTRO_CARDS, INTRO_HEADING, INTRO_LEAD, MODEL_NOTICE, NAV_ITEMS, NAV_SCROLL_THRESHOLD,
    REGULATIONS_HEADING, SITE_NAME, SectionId, TOOLS, ToolProfile,
};

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// The analyzer's result area: an error panel, a result panel, or nothing.
pub fn render_panel(state: &AnalyzerState) -> String {
    match state {
        AnalyzerState::Idle | AnalyzerState::Busy => String::new(),
        AnalyzerState::Failure(message) => render_error_panel(message),
        AnalyzerState::Success(analysis) => render_analysis(analysis),
    }
}

/// Error panel carrying a user-facing message.
pub fn render_error_panel(message: &str) -> String {
    format!(
        "<div id=\"analysis-error\" class=\"error-panel\" role=\"alert\">⚠ {}</div>",
        escape(message)
    )
}

fn render_analysis(analysis: &ScenarioAnalysis) -> String {
    let level = analysis.risk_level;
    let mut html = String::new();
    html.push_str(&format!(
        "<div id=\"analysis-result\" class=\"result\" data-risk=\"{level}\">\
<div class=\"risk-header {badge}\">\
<h3>風險等級：<span class=\"risk-level\">{level}</span></h3>\
<span class=\"tag\">AI 生成報告</span>\
<p class=\"summary\">{summary}</p></div>\
<div class=\"columns\">",
        badge = level.badge_class(),
        summary = escape(&analysis.summary),
    ));

    html.push_str("<div class=\"column\"><h4>⚠ 潛在威脅</h4>");
    for threat in &analysis.threats {
        html.push_str(&format!(
            "<div class=\"threat-card\"><h5>{}</h5><p>{}</p></div>",
            escape(&threat.title),
            escape(&threat.description)
        ));
    }
    html.push_str("</div><div class=\"column\"><h4>✓ 防護建議</h4>");
    for rec in &analysis.recommendations {
        html.push_str(&format!(
            "<div class=\"recommendation-card\"><h5>{}</h5><p>{}</p></div>",
            escape(&rec.title),
            escape(&rec.action)
        ));
    }
    html.push_str("</div></div></div>");
    html
}

/// The complete page. The script asks the server for a view on first use.
pub fn render_page(state: &AnalyzerState) -> String {
    let mut html = String::with_capacity(32 * 1024);
    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"zh-Hant\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{site} | AI 資安風險指南</title>\n<style>{STYLE}</style>\n</head>\n\
<body>\n",
        site = SITE_NAME,
    ));
    render_navbar(&mut html);
    html.push_str("<main>\n");
    render_hero(&mut html);
    render_intro(&mut html);
    render_analyzer(&mut html, state);
    render_regulations(&mut html);
    render_guidelines(&mut html);
    html.push_str("</main>\n");
    html.push_str(&format!(
        "<footer><p>{SITE_NAME} &copy; - 致力於打造安全的 AI 應用環境</p>\
<p class=\"muted\">{DISCLAIMER}<br>{MODEL_NOTICE}</p></footer>\n\
<script>const SCROLL_THRESHOLD = {NAV_SCROLL_THRESHOLD};{SCRIPT}</script>\n</body>\n</html>\n"
    ));
    html
}

fn render_navbar(html: &mut String) {
    html.push_str(&format!(
        "<nav id=\"navbar\"><a class=\"logo\" href=\"#{}\">🛡 {SITE_NAME}</a>\
<button id=\"menu-toggle\" aria-label=\"menu\">☰</button><div id=\"menu\">",
        SectionId::Hero.anchor()
    ));
    for item in &NAV_ITEMS {
        html.push_str(&format!("<a href=\"#{}\">{}</a>", item.section.anchor(), item.label));
    }
    html.push_str("</div></nav>\n");
}

fn render_hero(html: &mut String) {
    html.push_str(&format!(
        "<section id=\"{hero}\" class=\"hero\">\
<span class=\"pill\">AI Security Analysis Platform</span>\
<h1>AI 賦能未來<br><span class=\"accent\">資安守護現在</span></h1>\
<p>在這個 AI 工具爆發的時代，您的數據安全嗎？<br>\
我們提供專業且易懂的風險分析，協助您在享受便利的同時，建立堅固的資安防線。</p>\
<div class=\"actions\"><a class=\"button primary\" href=\"#{analyzer}\">立即檢測風險</a>\
<a class=\"button\" href=\"#{intro}\">了解更多</a></div>\
<div class=\"features\"><span>Privacy</span><span>Compliance</span><span>Security</span></div>\
</section>\n",
        hero = SectionId::Hero.anchor(),
        analyzer = SectionId::Analyzer.anchor(),
        intro = SectionId::Intro.anchor(),
    ));
}

fn render_intro(html: &mut String) {
    html.push_str(&format!(
        "<section id=\"{}\" class=\"band\"><h2>{INTRO_HEADING}</h2><p class=\"lead\">{INTRO_LEAD}</p><div class=\"grid three\">",
        SectionId::Intro.anchor()
    ));
    for card in &INTRO_CARDS {
        html.push_str(&format!("<div class=\"card\"><h3>{}</h3><p>{}</p></div>", card.title, card.body));
    }
    html.push_str("</div></section>\n");
}

fn render_analyzer(html: &mut String, state: &AnalyzerState) {
    let busy = state.is_busy();
    html.push_str(&format!(
        "<section id=\"{anchor}\"><h2>✨ AI 使用場景風險檢測</h2>\
<p class=\"lead\">輸入您的使用情境（例如：「我使用 ChatGPT 整理包含客戶姓名的會議記錄」），<br>AI 顧問將即時為您分析潛在資安隱患。</p>\
<div class=\"input-card\"><label for=\"scenario-input\">描述您的使用情境</label>\
<textarea id=\"scenario-input\" placeholder=\"請輸入... (範例：我打算用線上 AI 修圖工具處理公司內部產品原型的照片)\"></textarea>\
<div class=\"row\"><button id=\"analyze-button\" class=\"button primary\" disabled data-busy=\"{busy}\">{label}</button></div></div>\
<div id=\"analysis-panel\">{panel}</div>\
<template id=\"fallback-error\">{fallback}</template></section>\n",
        anchor = SectionId::Analyzer.anchor(),
        label = if busy { "分析中..." } else { "開始檢測" },
        panel = render_panel(state),
        fallback = render_error_panel(SERVICE_FAILURE_MESSAGE),
    ));
}

fn render_tool(html: &mut String, tool: &ToolProfile) {
    html.push_str(&format!(
        "<div class=\"tool\" style=\"border-top-color:{}\"><h3>{}</h3><div class=\"certs\">",
        tool.accent, tool.name
    ));
    for cert in tool.certifications {
        html.push_str(&format!(
            "<span class=\"cert {}\">{} {}{}</span>",
            cert.status.class(),
            cert.status.symbol(),
            cert.name,
            cert.label.map(|label| format!(" <small>{label}</small>")).unwrap_or_default()
        ));
    }
    html.push_str("</div>");
    if let Some(note) = tool.note {
        html.push_str(&format!("<p class=\"note\">{note}</p>"));
    }
    html.push_str(&format!(
        "<div class=\"box\"><strong class=\"warn\">主要安全風險</strong><p>{}</p></div>\
<div class=\"box\"><strong class=\"ok\">預防措施</strong><p>{}</p></div></div>",
        tool.risks, tool.prevention
    ));
}

fn render_regulations(html: &mut String) {
    html.push_str(&format!(
        "<section id=\"{}\"><h2>🌐 {REGULATIONS_HEADING}</h2>\
<p class=\"lead\">以「一般免費使用」為基準進行分析。<span class=\"warn\">黃色標示</span>代表該合規性僅存在於付費/企業版中，個人版使用者需特別注意風險。</p>\
<div class=\"grid four\">",
        SectionId::Regulations.anchor()
    ));
    for item in &INDUSTRY_HIGHLIGHTS {
        html.push_str(&format!("<div class=\"highlight\"><strong>{}</strong><p>{}</p></div>", item.title, item.body));
    }
    html.push_str("</div><div class=\"grid three\">");
    for tool in &TOOLS {
        render_tool(html, tool);
    }
    html.push_str("</div></section>\n");
}

fn render_guidelines(html: &mut String) {
    html.push_str(&format!(
        "<section id=\"{}\" class=\"band\"><h2>📘 {GUIDELINES_HEADING}</h2><div class=\"split\">\
<div><h3>AI 安全導入五步驟</h3><ol class=\"steps\">",
        SectionId::Guidelines.anchor()
    ));
    for step in &ADOPTION_STEPS {
        html.push_str(&format!("<li><h4>{}</h4><p>{}</p></li>", step.title, step.body));
    }
    html.push_str("</ol></div><div><h3>真實資安事件警示</h3>");
    for case in &INCIDENT_CASES {
        html.push_str(&format!(
            "<article class=\"case\"><header><span class=\"warn\">{}</span><span class=\"muted\">{}</span></header>\
<h4>{}</h4><p>{}</p><div class=\"lesson\"><strong>💡 教訓：</strong>{}</div></article>",
            case.category, case.context, case.title, case.story, case.lesson
        ));
    }
    html.push_str("</div></div></section>\n");
}

const STYLE: &str = r#"
*{box-sizing:border-box}html{scroll-behavior:smooth}
body{margin:0;font-family:system-ui,sans-serif;background:#0f172a;color:#f8fafc;line-height:1.6}
nav{position:fixed;top:0;left:0;right:0;z-index:50;display:flex;justify-content:space-between;align-items:center;padding:20px 24px;transition:all .3s}
nav.scrolled{background:rgba(15,23,42,.9);backdrop-filter:blur(8px);padding:12px 24px;box-shadow:0 4px 12px rgba(0,0,0,.4)}
nav a{color:#cbd5e1;text-decoration:none;margin-left:24px}nav .logo{margin:0;font-weight:700;color:#fff}
#menu-toggle{display:none;background:none;border:0;color:#fff;font-size:24px}
@media(max-width:768px){#menu{display:none;position:absolute;top:100%;left:0;right:0;background:#1e293b;flex-direction:column;padding:16px}
#menu.open{display:flex}#menu-toggle{display:block}}
section{padding:96px 24px;max-width:1200px;margin:0 auto}section.band{max-width:none;background:#1e293b}
h2{text-align:center}.lead{text-align:center;color:#94a3b8;max-width:720px;margin:0 auto 40px}
.hero{min-height:100vh;display:flex;flex-direction:column;justify-content:center;align-items:center;text-align:center}
.hero h1{font-size:3.5rem}.accent{color:#0ea5e9}.pill{border:1px solid #334155;border-radius:999px;padding:6px 16px;color:#cbd5e1}
.features span{margin:0 24px;color:#64748b;text-transform:uppercase;letter-spacing:.2em;font-size:.75rem}
.button{display:inline-block;padding:12px 28px;border-radius:12px;border:1px solid #334155;color:#e2e8f0;text-decoration:none;background:#1e293b;cursor:pointer}
.button.primary{background:#0284c7;border-color:#0284c7;color:#fff}.button:disabled{background:#334155;cursor:not-allowed}
.grid{display:grid;gap:24px;max-width:1200px;margin:0 auto 48px}.grid.three{grid-template-columns:repeat(auto-fit,minmax(300px,1fr))}
.grid.four{grid-template-columns:repeat(auto-fit,minmax(240px,1fr))}
.card,.tool,.highlight,.case,.input-card{background:#1e293b;border:1px solid #334155;border-radius:16px;padding:24px}
.tool{border-top:4px solid}.certs{display:flex;flex-wrap:wrap;gap:8px;margin-bottom:12px}
.cert{font-size:.75rem;padding:4px 10px;border-radius:6px;border:1px solid}
.cert-pass{color:#34d399;border-color:#065f46}.cert-warn{color:#fbbf24;border-color:#92400e}.cert-fail{color:#64748b;border-color:#475569}
.note{font-size:.75rem;color:#94a3b8;border-left:2px solid #475569;padding-left:8px}
.box{background:#0f172a;border-radius:8px;padding:12px;margin-top:12px}.warn{color:#fb923c}.ok{color:#34d399}.muted{color:#64748b}
textarea{width:100%;min-height:120px;background:#0f172a;color:#fff;border:1px solid #475569;border-radius:12px;padding:16px;resize:none}
.row{display:flex;justify-content:flex-end;margin-top:16px}
.error-panel{margin-top:32px;padding:16px;border:1px solid #ef4444;border-radius:12px;color:#fca5a5;background:rgba(127,29,29,.2)}
.result{margin-top:40px}.risk-header{padding:24px;border-radius:16px;border:1px solid;margin-bottom:32px}
.bg-emerald-500\/20{background:rgba(16,185,129,.2);color:#34d399}.bg-yellow-500\/20{background:rgba(234,179,8,.2);color:#facc15}
.bg-orange-500\/20{background:rgba(249,115,22,.2);color:#fb923c}.bg-red-500\/20{background:rgba(239,68,68,.2);color:#f87171}
.tag{font-size:.8rem;border:1px solid currentColor;border-radius:999px;padding:2px 12px}
.columns{display:grid;grid-template-columns:repeat(auto-fit,minmax(320px,1fr));gap:32px}
.threat-card,.recommendation-card{background:#0f172a;border-radius:12px;padding:16px;margin-bottom:16px;border-left:4px solid #f97316}
.recommendation-card{border-left-color:#10b981}.threat-card p,.recommendation-card p{color:#94a3b8;font-size:.875rem}
.split{display:grid;grid-template-columns:7fr 5fr;gap:48px;max-width:1200px;margin:0 auto}
.steps li{background:#0f172a;border:1px solid #334155;border-radius:12px;padding:16px 20px;margin-bottom:24px;list-style:none}
.case{margin-bottom:24px}.case header{display:flex;justify-content:space-between;font-size:.75rem}
.lesson{background:#020617;border-left:2px solid #ef4444;padding:12px;font-size:.8rem}
footer{background:#020617;text-align:center;padding:40px 24px;color:#64748b}
"#;

const SCRIPT: &str = r#"
(() => {
  const nav = document.getElementById('navbar');
  const menu = document.getElementById('menu');
  const input = document.getElementById('scenario-input');
  const button = document.getElementById('analyze-button');
  const panel = document.getElementById('analysis-panel');
  const fallback = document.getElementById('fallback-error').innerHTML;
  let view = null;
  let busy = false;

  const onScroll = () => nav.classList.toggle('scrolled', window.scrollY > SCROLL_THRESHOLD);
  window.addEventListener('scroll', onScroll);
  onScroll();
  document.getElementById('menu-toggle').addEventListener('click', () => menu.classList.toggle('open'));
  menu.querySelectorAll('a').forEach(a => a.addEventListener('click', () => menu.classList.remove('open')));

  const refresh = () => {
    button.disabled = busy || input.value.trim() === '';
    button.textContent = busy ? '分析中...' : '開始檢測';
  };

  const openView = async () => {
    if (view === null) {
      const res = await fetch('/api/views', { method: 'POST' });
      if (!res.ok) throw new Error(`view creation failed: ${res.status}`);
      view = (await res.json()).id;
    }
    return view;
  };

  input.addEventListener('input', () => {
    if (panel.innerHTML !== '') {
      panel.innerHTML = '';
      if (view !== null) fetch(`/api/views/${view}/input`, { method: 'POST' }).catch(() => {});
    }
    refresh();
  });

  button.addEventListener('click', async () => {
    if (busy || input.value.trim() === '') return;
    busy = true;
    panel.innerHTML = '';
    refresh();
    try {
      const id = await openView();
      const res = await fetch(`/api/views/${id}/analyze`, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ scenario: input.value }),
      });
      // An expired view is replaced on the next attempt.
      if (res.status === 404 || res.status === 410) view = null;
      const body = await res.json().catch(() => null);
      if (body && typeof body.panel === 'string' && body.panel !== '') {
        panel.innerHTML = body.panel;
      } else if (!res.ok || body === null) {
        panel.innerHTML = fallback;
      }
    } catch (err) {
      console.error(err);
      panel.innerHTML = fallback;
    } finally {
      busy = false;
      refresh();
    }
  });

  window.addEventListener('pagehide', () => {
    if (view !== null) navigator.sendBeacon(`/api/views/${view}/close`);
    view = null;
  });
  refresh();
})();
"#;
