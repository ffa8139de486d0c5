//! Static page content.
//!
//! Everything here is configuration data. In particular the certification
//! badges are declared per tool; nothing computes pass/warn/fail.

/// In-page anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Hero,
    Intro,
    Analyzer,
    Regulations,
    Guidelines,
}

impl SectionId {
    pub fn anchor(self) -> &'static str {
        match self {
            SectionId::Hero => "hero",
            SectionId::Intro => "intro",
            SectionId::Analyzer => "analyzer",
            SectionId::Regulations => "regulations",
            SectionId::Guidelines => "guidelines",
        }
    }
}

pub struct NavItem {
    pub section: SectionId,
    pub label: &'static str,
}

pub const SITE_NAME: &str = "AI Sentinel";

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem { section: SectionId::Intro, label: "風險導論" },
    NavItem { section: SectionId::Analyzer, label: "AI 風險檢測" },
    NavItem { section: SectionId::Regulations, label: "關鍵法規" },
    NavItem { section: SectionId::Guidelines, label: "安全指南" },
];

/// Scroll offset (px) past which the navbar switches to its solid style.
pub const NAV_SCROLL_THRESHOLD: u32 = 20;

pub struct InfoCard {
    pub title: &'static str,
    pub body: &'static str,
}

pub const INTRO_HEADING: &str = "為什麼 AI 資安不容忽視？";
pub const INTRO_LEAD: &str = "隨著生成式 AI 的普及，企業與個人在享受效率提升的同時，也面臨著前所未有的數據洩漏風險。\
不當的 Prompt 輸入可能導致機密外流，而使用不合規的工具則可能觸犯國際法規。";

pub const INTRO_CARDS: [InfoCard; 3] = [
    InfoCard {
        title: "數據隱私洩漏",
        body: "將客戶個資或公司機密輸入到公開的 AI 模型中，可能導致資料被用於模型訓練而公開。",
    },
    InfoCard {
        title: "惡意內容生成",
        body: "攻擊者可能利用 AI 生成釣魚郵件或惡意程式碼，降低了網路攻擊的門檻。",
    },
    InfoCard {
        title: "合規性風險",
        body: "GDPR 與歐盟 AI 法案對數據處理有嚴格規範，違規可能面臨巨額罰款。",
    },
];

pub const INDUSTRY_HIGHLIGHTS: [InfoCard; 4] = [
    InfoCard {
        title: "醫療業",
        body: "必須選擇支援 HIPAA 的工具，如 Microsoft Copilot 或 Claude Enterprise。",
    },
    InfoCard {
        title: "金融業",
        body: "需要 SOC 2 Type 2 認證，並要求嚴格的資料加密與完整審計日誌。",
    },
    InfoCard {
        title: "歐盟客戶",
        body: "確保工具符合 GDPR，並特別注意資料儲存地點 (Data Residency) 需在歐盟境內。",
    },
    InfoCard {
        title: "教育機構",
        body: "需考慮 FERPA 與兒童隱私保護 (COPPA)，避免學生個資被採集用於模型訓練。",
    },
];

/// Availability of a certification for the free/general tier of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    /// Available in the general version.
    Pass,
    /// Only in paid or enterprise editions.
    Warn,
    /// Not available.
    Fail,
}

impl CertStatus {
    pub fn class(self) -> &'static str {
        match self {
            CertStatus::Pass => "cert-pass",
            CertStatus::Warn => "cert-warn",
            CertStatus::Fail => "cert-fail",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CertStatus::Pass => "✓",
            CertStatus::Warn => "♛",
            CertStatus::Fail => "✗",
        }
    }
}

pub struct Certification {
    pub name: &'static str,
    pub status: CertStatus,
    pub label: Option<&'static str>,
}

pub struct ToolProfile {
    pub name: &'static str,
    pub accent: &'static str,
    pub certifications: &'static [Certification],
    pub risks: &'static str,
    pub prevention: &'static str,
    pub note: Option<&'static str>,
}

const fn cert(name: &'static str, status: CertStatus, label: Option<&'static str>) -> Certification {
    Certification { name, status, label }
}

const ENTERPRISE_ONLY: Option<&str> = Some("(僅企業版)");
const WORKSPACE_ONLY: Option<&str> = Some("(僅工作區版)");

pub const REGULATIONS_HEADING: &str = "關鍵法規與工具分析";

pub const TOOLS: [ToolProfile; 6] = [
    ToolProfile {
        name: "Microsoft Copilot",
        accent: "#3b82f6",
        certifications: &[
            cert("GDPR", CertStatus::Pass, None),
            cert("HIPAA", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("SOC 2", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("ISO 27001", CertStatus::Warn, ENTERPRISE_ONLY),
        ],
        risks: "與 Microsoft 365 深度整合，若企業內部權限(ACL)設定混亂，員工可能透過 AI 搜尋到不該看到的薪資或人事檔案。",
        prevention: "實施嚴格的零信任架構與 RBAC (角色存取控制)，定期審查 Sharepoint/OneDrive 權限。",
        note: None,
    },
    ToolProfile {
        name: "ChatGPT",
        accent: "#10b981",
        certifications: &[
            cert("GDPR", CertStatus::Pass, None),
            cert("HIPAA", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("SOC 2", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("ISO 27001", CertStatus::Warn, ENTERPRISE_ONLY),
        ],
        risks: "Free/Plus 版本預設會將對話用於模型訓練。員工若上傳程式碼或個資，可能發生類似三星的資料外洩事件。",
        prevention: "企業應強制使用 Team 或 Enterprise 版，或在個人設定中關閉「訓練模型」選項。",
        note: None,
    },
    ToolProfile {
        name: "Claude (Anthropic)",
        accent: "#f97316",
        certifications: &[
            cert("GDPR", CertStatus::Pass, None),
            cert("HIPAA", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("SOC 2", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("ISO 27001", CertStatus::Fail, None),
        ],
        risks: "擁有超長 Context Window，使用者容易一次性貼入整份機密合約或大量客戶資料，增加了單次外洩的規模風險。",
        prevention: "導入 DLP (資料遺失防護) 系統，偵測並攔截包含敏感關鍵字的大量文字貼上行為。",
        note: None,
    },
    ToolProfile {
        name: "Gemini",
        accent: "#0ea5e9",
        certifications: &[
            cert("GDPR", CertStatus::Pass, None),
            cert("HIPAA", CertStatus::Pass, Some("(企業版更嚴謹)")),
            cert("SOC 2", CertStatus::Warn, WORKSPACE_ONLY),
            cert("ISO 27001", CertStatus::Warn, WORKSPACE_ONLY),
        ],
        risks: "Gemini for Workspace 的擴充功能可能過度存取 Drive 或 Gmail 資料；免費版消費端資料可能被人工審查。",
        prevention: "透過 Google Admin Console 限制 AI 存取範圍，並關閉不必要的第三方擴充功能 (Extensions)。",
        note: Some(
            "註：工作區版是指企業付費訂閱的 Gemini Business 或 Gemini Enterprise，或透過 Google Cloud (Vertex AI) 呼叫的 API。",
        ),
    },
    ToolProfile {
        name: "Notion AI",
        accent: "#94a3b8",
        certifications: &[
            cert("GDPR", CertStatus::Pass, None),
            cert("HIPAA", CertStatus::Warn, ENTERPRISE_ONLY),
            cert("SOC 2", CertStatus::Pass, Some("(Type 2)")),
            cert("ISO 27001", CertStatus::Pass, None),
        ],
        risks: "Notion 常作為知識庫，AI 功能會自動索引所有頁面。若將敏感資料區隔不當，容易被無權限者透過問答獲取。",
        prevention: "將敏感資料區隔在獨立的 Teamspace，並設定嚴格的頁面級別權限，避免全域 AI 索引。",
        note: None,
    },
    ToolProfile {
        name: "豆包 (Doubao)",
        accent: "#ef4444",
        certifications: &[
            cert("中國生成式AI備案", CertStatus::Pass, None),
            cert("GDPR", CertStatus::Fail, None),
            cert("HIPAA", CertStatus::Fail, None),
            cert("SOC 2", CertStatus::Fail, None),
            cert("ISO 27001", CertStatus::Fail, None),
        ],
        risks: "資料儲存與審查機制符合中國法規，對於跨國企業存在資料跨境傳輸合規風險 (Data Residency)。",
        prevention: "僅用於生成非敏感、非商業機密的一般性中文內容；嚴禁輸入歐美客戶個資或研發機密。",
        note: None,
    },
];

pub const GUIDELINES_HEADING: &str = "新手安全落地指南";

pub const ADOPTION_STEPS: [InfoCard; 5] = [
    InfoCard {
        title: "1. 評估資料與法規需求",
        body: "確認將處理的資料類型 (PII/商業機密) 及所屬產業法規 (如醫療需 HIPAA、歐盟需 GDPR)。這決定了您能選用哪些工具。",
    },
    InfoCard {
        title: "2. 估算總擁有成本 (TCO)",
        body: "除軟體訂閱費外，務必納入「人工審核 (Human-in-the-loop)」的人力成本與資安維護費用。",
    },
    InfoCard {
        title: "3. 配置隱私設定 (Opt-out)",
        body: "在工具後台關閉「使用我的數據進行模型訓練」。企業版應強制實施此策略，確保資料不被反饋至模型。",
    },
    InfoCard {
        title: "4. 數據脫敏處理 (Data Anonymization)",
        body: "在使用任何公有 AI 前，移除所有可識別個資 (姓名/證號)。使用代號替換真實名稱，這是最有效的防護。",
    },
    InfoCard {
        title: "5. 建立監控與審核機制",
        body: "永遠不要直接信任 AI 產出。建立標準作業程序 (SOP)，要求所有 AI 生成內容必須經過人工複查與驗證。",
    },
];

pub struct IncidentCase {
    pub category: &'static str,
    pub context: &'static str,
    pub title: &'static str,
    pub story: &'static str,
    pub lesson: &'static str,
}

pub const INCIDENT_CASES: [IncidentCase; 2] = [
    IncidentCase {
        category: "社交工程詐騙",
        context: "2025/07 | 新加坡",
        title: "Deepfake 變臉詐騙 50 萬鎂",
        story: "駭客利用 Deepfake 技術複製 CEO 的臉部與聲音，假裝召開線上 Zoom 會議。透過權威性的語氣與緊急的社交工程話術，成功騙過財務主管，使其在會議後將近 50 萬美元匯入駭客帳戶。",
        lesson: "涉及金流操作時，必須透過第二管道（如內部簽核系統或回撥電話）進行雙重驗證 (OOB)，不可僅依賴視訊指令。",
    },
    IncidentCase {
        category: "內部資料外洩",
        context: "企業內部疏失",
        title: "ChatGPT 程式碼洩漏事件",
        story: "某公司員工將內部核心程式碼上傳至 ChatGPT 公開版求助除錯。由於未關閉訓練設定，該段機密程式碼被納入模型資料庫，隨後在其他外部用戶詢問相關技術問題時，被 AI 意外洩漏出來。",
        lesson: "嚴禁將 Proprietary Code 貼入公有 AI 服務。應建立內網專屬的 AI Gateway，或採購保證不訓練資料的 Enterprise 版本。",
    },
];

pub const DISCLAIMER: &str = "免責聲明：本平台提供的風險分析僅供參考，不構成法律建議。";
pub const MODEL_NOTICE: &str =
    "Gemini may display inaccurate info, including about people, so double-check its responses.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_targets_are_distinct_sections() {
        let anchors: Vec<&str> = NAV_ITEMS.iter().map(|item| item.section.anchor()).collect();
        assert_eq!(anchors, ["intro", "analyzer", "regulations", "guidelines"]);
    }

    #[test]
    fn every_tool_lists_gdpr() {
        for tool in &TOOLS {
            assert!(
                tool.certifications.iter().any(|c| c.name == "GDPR"),
                "{} has no GDPR entry",
                tool.name
            );
        }
    }
}
