// Prompt templates for the four analysis tasks.
// `{query}` is replaced with the user's query at render time.

pub const DOCUMENT_ANALYSIS: &str = "\
Analyze the provided financial document(s) and the user query: {query}.
Scope:
1) Identify the document type (e.g., Income Statement, Balance Sheet, Cash Flow, MD&A, 10-K/AR).
2) Extract key metrics (revenue, gross margin, operating margin, net income, EPS, FCF, debt, cash, current ratio).
3) Compute trends (YoY/ QoQ where possible) and important ratios (profitability, liquidity, leverage, efficiency).
4) Summarize drivers, risks, and uncertainties strictly supported by the document.
5) If information is missing/ambiguous, explicitly state uncertainties and request needed data.
Rules:
- Use only available documents/tools. Do not fabricate values or URLs.
- If using web search, cite reputable sources and include precise dates.
- No personalized investment advice; present findings as informational analysis.";

pub const DOCUMENT_ANALYSIS_OUTPUT: &str = r#"{
  "document_type": "<type>",
  "time_coverage": {"start": "<YYYY-MM-DD or FY/Q>", "end": "<YYYY-MM-DD or FY/Q>"},
  "company": "<name if known>",
  "key_metrics": {
    "revenue": {"value": <number>, "unit": "<USD millions>", "period": "<FY/Q>"},
    "gross_margin_pct": <number|null>,
    "operating_margin_pct": <number|null>,
    "net_income": {"value": <number|null>, "unit": "<USD millions>", "period": "<FY/Q>"},
    "free_cash_flow": {"value": <number|null>, "unit": "<USD millions>", "period": "<FY/Q>"},
    "cash": <number|null>, "debt": <number|null>, "current_ratio": <number|null>
  },
  "trends": [{"metric": "<name>", "direction": "up|down|flat", "evidence": "<page/section reference>"}],
  "analysis": [{"topic": "<profitability/liquidity/leverage/efficiency>", "insight": "<concise, evidence-backed>"}],
  "risks_and_uncertainties": [{"risk": "<name>", "evidence": "<doc reference>"}],
  "limitations": ["<explicit unknowns or missing data>"],
  "citations": [{"source": "<doc section or URL>", "accessed": "<YYYY-MM-DD>"}],
  "disclaimer": "This is informational analysis, not investment advice."
}"#;

pub const INVESTMENT_ANALYSIS: &str = "\
Translate the analysis into scenario-based, informational investment implications for {query}.
Scope:
1) Summarize valuation context (if inputs available): e.g., P/E, EV/EBITDA, P/S vs peer/5y range.
2) Provide neutral scenarios (bull/base/bear) with key drivers and evidence from documents.
3) Outline potential catalysts, risks, and checkpoints to monitor (dates, metrics, covenants).
4) Clearly separate facts (from docs) from assumptions (label as assumptions).
Rules:
- No recommendations to buy/sell/hold or product pushing.
- No guarantees; no fabricated research; cite any external data.
- If peer/market data unavailable, say so and proceed with document-only view.";

pub const INVESTMENT_ANALYSIS_OUTPUT: &str = r#"{
  "valuation_snapshot": {
    "pe": {"value": <number|null>, "note": "<if unavailable, say why>"},
    "ev_ebitda": {"value": <number|null>},
    "ps": {"value": <number|null>},
    "peer_context": "<brief or null>"
  },
  "scenarios": [
    {"name": "Bull", "assumptions": ["<list>"], "evidence": ["<doc refs>"], "watch_items": ["<metrics/dates>"]},
    {"name": "Base", "assumptions": ["<list>"], "evidence": ["<doc refs>"], "watch_items": ["<metrics/dates>"]},
    {"name": "Bear", "assumptions": ["<list>"], "evidence": ["<doc refs>"], "watch_items": ["<metrics/dates>"]}
  ],
  "catalysts": ["<events, filings, product launches, macro prints>"],
  "key_risks": ["<from documents or disclosed risk factors>"],
  "monitoring_checklist": ["<KPI1>", "<KPI2>", "<debt covenant>", "<filing date>"],
  "citations": [{"source": "<doc section or URL>", "accessed": "<YYYY-MM-DD>"}],
  "disclaimer": "Educational information only; not investment advice."
}"#;

pub const RISK_ASSESSMENT: &str = "\
Produce a balanced risk assessment grounded in the financial document(s) for {query}.
Scope:
1) Identify risk categories: market, credit, liquidity, operational, legal/regulatory.
2) Map each risk to evidence in the document and potential impact/probability (qualitative).
3) Propose reasonable mitigations and early-warning indicators.
Rules:
- Do not invent risks or institutions. No extreme claims without evidence.
- If data is insufficient to rate a risk, mark it as 'insufficient data'.
- Keep language precise and non-alarmist.";

pub const RISK_ASSESSMENT_OUTPUT: &str = r#"{
  "risk_register": [
    {
      "category": "market|credit|liquidity|operational|legal",
      "name": "<concise>",
      "evidence": "<doc section/page>",
      "likelihood": "low|medium|high|unknown",
      "impact": "low|medium|high|unknown",
      "mitigations": ["<actions>"],
      "early_indicators": ["<metrics/events>"]
    }
  ],
  "overall_view": "<1-3 sentence summary>",
  "limitations": ["<missing disclosures, stale data, etc.>"],
  "citations": [{"source": "<doc section or URL>", "accessed": "<YYYY-MM-DD>"}],
  "disclaimer": "Risk assessment is informational; not investment advice."
}"#;

pub const VERIFICATION: &str = "\
Verify the uploaded file is a financial document suitable for analysis.
Checks:
1) File type/structure (parseable text/tables), presence of financial sections (IS/BS/CF, notes, MD&A).
2) Period coverage and dates; currency and units.
3) Internal consistency (subtotals, totals, footnote references).
4) Red flags (images-only scans without text, missing periods, mismatched totals).
Rules:
- Do not assume; confirm with evidence. If uncertain, report exactly what is missing.
- No hallucinations. Do not label non-financial files as financial.";

pub const VERIFICATION_OUTPUT: &str = r#"{
  "is_financial_document": true|false,
  "document_type": "<type or null>",
  "periods_detected": ["<FY2024>", "<Q1-2025>"],
  "currency_units": "<e.g., USD millions or unknown>",
  "structure_ok": true|false,
  "issues": ["<list concrete parsing/consistency issues>"],
  "next_steps": ["<request specific files/pages or clearer scans>"]
}"#;
