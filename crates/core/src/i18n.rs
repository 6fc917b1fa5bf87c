use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Languages the widget ships response packs for. Anything else falls back
/// to [`Language::DEFAULT`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Ko,
    En,
    Ja,
    Zh,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unsupported language code `{0}`")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const DEFAULT: Language = Language::Ko;

    pub fn code(self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Ja => "ja",
            Language::Zh => "zh",
        }
    }

    /// Parses a BCP 47 style tag, ignoring any region subtag (`en-US` -> En).
    /// Unknown codes resolve to the default language rather than failing, the
    /// widget always has something to say.
    pub fn from_tag(tag: &str) -> Language {
        tag.parse().unwrap_or(Language::DEFAULT)
    }
}

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let primary = value.trim().split(['-', '_']).next().unwrap_or_default();
        match primary.to_ascii_lowercase().as_str() {
            "ko" => Ok(Language::Ko),
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            "zh" => Ok(Language::Zh),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Prompt and re-prompt text for one order-collection step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepStrings {
    pub prompt: &'static str,
    pub error: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickReplySets {
    pub welcome: &'static [&'static str],
    pub services: &'static [&'static str],
    pub quoting: &'static [&'static str],
    pub after_cancel: &'static [&'static str],
    pub after_order: &'static [&'static str],
    pub fallback: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLabels {
    pub quote_title: &'static str,
    pub total: &'static str,
    pub order_title: &'static str,
    pub order_number: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub amount: &'static str,
    pub currency_suffix: &'static str,
}

/// One language worth of literal response material. Response *selection*
/// lives in [`crate::responses`]; this is only the data.
#[derive(Clone, Copy, Debug)]
pub struct LocalePack {
    pub welcome: &'static str,
    pub greeting: &'static [&'static str],
    pub service_overview: &'static str,
    pub website: &'static str,
    pub app: &'static str,
    pub ai_solution: &'static str,
    pub design: &'static str,
    pub price_inquiry: &'static str,
    pub portfolio: &'static str,
    pub contact: &'static str,
    pub thanks: &'static [&'static str],
    pub fallback: &'static [&'static str],
    pub quote_pick_service: &'static str,
    pub quote_ready: &'static str,
    pub quote_cancelled: &'static str,
    pub order_confirmed: &'static str,
    pub apology: &'static str,
    pub collect_name: StepStrings,
    pub collect_email: StepStrings,
    pub collect_phone: StepStrings,
    pub collect_details: StepStrings,
    pub quick: QuickReplySets,
    pub card: CardLabels,
}

/// Returns the pack for `language`. Total over [`Language`], so a session
/// configured with an unsupported tag already fell back at parse time.
pub fn pack(language: Language) -> &'static LocalePack {
    match language {
        Language::Ko => &KO,
        Language::En => &EN,
        Language::Ja => &JA,
        Language::Zh => &ZH,
    }
}

static KO: LocalePack = LocalePack {
    welcome: "안녕하세요! 😊 무엇을 도와드릴까요?",
    greeting: &[
        "안녕하세요! 😊 어떤 서비스가 필요하신가요? 웹사이트, 앱, AI 솔루션 등 다양한 서비스를 제공하고 있어요!",
        "반갑습니다! 👋 무엇을 도와드릴까요? 궁금한 서비스가 있으시면 편하게 물어보세요!",
    ],
    service_overview: "제공하는 서비스입니다 🌟\n\n🌐 웹사이트 제작 (50만원~)\n📱 앱 개발 (300만원~)\n🤖 AI 솔루션 (100만원~)\n🎨 디자인 (50만원~)\n\n어떤 서비스가 관심 있으신가요?",
    website: "웹사이트 제작에 관심 있으시군요! 👍\n\n📦 Basic (50만원~, 5페이지, 2주)\n📦 Professional (150만원~, 10페이지, 3주)\n📦 쇼핑몰 (300만원~, 결제 연동, 4주)\n\n원하시는 유형이나 예산을 말씀해주시면 맞춤 견적 드릴게요! 💰",
    app: "앱 개발 문의 감사합니다! 📱\n\n📦 하이브리드 앱 (300만원~, iOS/Android 동시, 6주)\n📦 네이티브 앱 (500만원~, 8주)\n\n어떤 종류의 앱을 생각하고 계신가요?",
    ai_solution: "AI 솔루션에 관심 있으시군요! 🤖\n\n📦 AI 챗봇 (100만원~, 24시간 응대)\n📦 업무 자동화 (200만원~)\n\n어떤 업무를 자동화하고 싶으신가요?",
    design: "디자인 문의 감사합니다! 🎨\n\n📦 UI/UX 디자인 (50만원~, 2주)\n📦 브랜딩 (100만원~, 3주)\n\n어떤 디자인이 필요하신가요?",
    price_inquiry: "견적 문의 감사합니다! 💰\n\n정확한 견적을 위해 어떤 서비스가 필요하신지 말씀해주세요.\n(웹사이트/앱/AI/디자인)",
    portfolio: "작업 사례가 궁금하시군요! 📂\n\n✅ 100+ 웹사이트 제작\n✅ 50+ 앱 개발\n✅ 30+ AI 프로젝트\n\n연락처 남겨주시면 상세 자료 보내드릴게요!",
    contact: "상담 예약을 원하시는군요! 📞\n\n성함과 연락처를 남겨주시면 담당자가 빠르게 연락드릴게요! 😊",
    thanks: &[
        "감사합니다! 😊 더 궁금한 점 있으시면 언제든 물어보세요!",
        "천만에요! 좋은 하루 되세요! 🌟",
    ],
    fallback: &[
        "문의 감사합니다! 😊 조금 더 구체적으로 말씀해주시면 맞춤 안내 드릴게요.",
        "네, 이해했습니다! 👍 원하시는 서비스나 예산을 알려주세요!",
    ],
    quote_pick_service: "어떤 서비스를 선택하시겠어요?",
    quote_ready: "견적이 준비되었습니다! 💰",
    quote_cancelled: "견적을 취소했습니다. 다른 도움이 필요하신가요?",
    order_confirmed: "주문이 접수되었습니다! 🎉 담당자가 빠른 시일 내에 연락드리겠습니다.",
    apology: "죄송합니다, 일시적인 오류가 발생했습니다. 다시 시도해주세요.",
    collect_name: StepStrings {
        prompt: "담당자 성함을 알려주세요.",
        error: "성함을 입력해주세요.",
    },
    collect_email: StepStrings {
        prompt: "연락받으실 이메일을 알려주세요.",
        error: "올바른 이메일 주소를 입력해주세요. (예: name@example.com)",
    },
    collect_phone: StepStrings {
        prompt: "전화번호를 알려주세요. (예: 010-1234-5678)",
        error: "올바른 전화번호를 입력해주세요.",
    },
    collect_details: StepStrings {
        prompt: "마지막으로, 원하시는 내용을 간단히 말씀해주세요.",
        error: "요청 내용을 입력해주세요.",
    },
    quick: QuickReplySets {
        welcome: &["웹사이트 제작", "앱 개발", "AI 솔루션", "견적 문의"],
        services: &["웹사이트", "앱 개발", "AI 솔루션", "디자인"],
        quoting: &["옵션 추가", "견적 확정", "취소"],
        after_cancel: &["서비스 보기", "처음으로"],
        after_order: &["다른 서비스 보기", "처음으로"],
        fallback: &["서비스 안내", "견적 문의", "상담 예약"],
    },
    card: CardLabels {
        quote_title: "📋 견적서",
        total: "총 금액",
        order_title: "📦 주문 정보 확인",
        order_number: "주문번호",
        name: "담당자",
        email: "이메일",
        phone: "연락처",
        amount: "견적 금액",
        currency_suffix: "원",
    },
};

static EN: LocalePack = LocalePack {
    welcome: "Hello! 😊 How can I help you?",
    greeting: &[
        "Hello! 😊 What service do you need? We build websites, apps, and AI solutions!",
        "Welcome! 👋 Ask me anything about our services.",
    ],
    service_overview: "Here is what we offer 🌟\n\n🌐 Web development (from $400)\n📱 App development (from $2,500)\n🤖 AI solutions (from $800)\n🎨 Design (from $400)\n\nWhich one are you interested in?",
    website: "Interested in a website! 👍\n\n📦 Basic (from $400, 5 pages, 2 weeks)\n📦 Professional (from $1,200, 10 pages, 3 weeks)\n📦 E-commerce (from $2,500, payments included, 4 weeks)\n\nTell me your budget or the type you want and I'll prepare a quote! 💰",
    app: "Thanks for asking about app development! 📱\n\n📦 Hybrid app (from $2,500, iOS/Android, 6 weeks)\n📦 Native app (from $4,000, 8 weeks)\n\nWhat kind of app do you have in mind?",
    ai_solution: "Interested in AI! 🤖\n\n📦 AI chatbot (from $800, 24/7 support)\n📦 Workflow automation (from $1,600)\n\nWhat would you like to automate?",
    design: "Thanks for asking about design! 🎨\n\n📦 UI/UX design (from $400, 2 weeks)\n📦 Branding (from $800, 3 weeks)\n\nWhat do you need designed?",
    price_inquiry: "Thanks for the quote inquiry! 💰\n\nTell me which service you need and I'll prepare an estimate.\n(Website / App / AI / Design)",
    portfolio: "Curious about our work! 📂\n\n✅ 100+ websites\n✅ 50+ apps\n✅ 30+ AI projects\n\nLeave your contact details and we'll send references!",
    contact: "Happy to set up a consultation! 📞\n\nLeave your name and contact details and we'll reach out shortly! 😊",
    thanks: &[
        "Thank you! 😊 Ask me anything else, any time!",
        "You're welcome! Have a great day! 🌟",
    ],
    fallback: &[
        "Thanks for reaching out! 😊 Could you be a bit more specific so I can point you the right way?",
        "Got it! 👍 Tell me which service or budget you have in mind!",
    ],
    quote_pick_service: "Which service would you like?",
    quote_ready: "Your quote is ready! 💰",
    quote_cancelled: "Quote cancelled. Anything else I can help with?",
    order_confirmed: "Your order has been received! 🎉 Our team will contact you shortly.",
    apology: "Sorry, something went wrong. Please try again.",
    collect_name: StepStrings {
        prompt: "May I have your name?",
        error: "Please enter your name.",
    },
    collect_email: StepStrings {
        prompt: "What email should we contact you at?",
        error: "Please enter a valid email address (e.g. name@example.com).",
    },
    collect_phone: StepStrings {
        prompt: "What is your phone number?",
        error: "Please enter a valid phone number.",
    },
    collect_details: StepStrings {
        prompt: "Finally, briefly describe what you need.",
        error: "Please describe your request.",
    },
    quick: QuickReplySets {
        welcome: &["Web Development", "App Development", "AI Solutions", "Get Quote"],
        services: &["Website", "App", "AI Solutions", "Design"],
        quoting: &["Add option", "Confirm quote", "Cancel"],
        after_cancel: &["View services", "Start over"],
        after_order: &["View other services", "Start over"],
        fallback: &["Services", "Get Quote", "Consultation"],
    },
    card: CardLabels {
        quote_title: "📋 Quote",
        total: "Total",
        order_title: "📦 Order Summary",
        order_number: "Order no.",
        name: "Name",
        email: "Email",
        phone: "Phone",
        amount: "Quoted amount",
        currency_suffix: " KRW",
    },
};

static JA: LocalePack = LocalePack {
    welcome: "こんにちは！😊 何かお手伝いできますか？",
    greeting: &["こんにちは！😊 ウェブサイト、アプリ、AIソリューションなど、お気軽にご相談ください！"],
    service_overview: "提供しているサービスです 🌟\n\n🌐 ウェブサイト制作\n📱 アプリ開発\n🤖 AIソリューション\n🎨 デザイン\n\nどのサービスにご興味がありますか？",
    website: "ウェブサイト制作ですね！👍\n\n📦 Basic（5ページ、2週間）\n📦 Professional（10ページ、3週間）\n📦 EC サイト（決済連携、4週間）\n\nご予算をお知らせいただければお見積もりします！💰",
    app: "アプリ開発のお問い合わせありがとうございます！📱\n\n📦 ハイブリッドアプリ（iOS/Android、6週間）\n📦 ネイティブアプリ（8週間）\n\nどんなアプリをお考えですか？",
    ai_solution: "AIソリューションですね！🤖\n\n📦 AIチャットボット\n📦 業務自動化\n\nどの業務を自動化したいですか？",
    design: "デザインのお問い合わせありがとうございます！🎨\n\n📦 UI/UXデザイン\n📦 ブランディング\n\nどんなデザインが必要ですか？",
    price_inquiry: "お見積もりのご依頼ありがとうございます！💰\n\n必要なサービスを教えてください。（ウェブ/アプリ/AI/デザイン）",
    portfolio: "実績をご紹介します！📂\n\n✅ 100+ ウェブサイト\n✅ 50+ アプリ\n✅ 30+ AIプロジェクト\n\n連絡先をいただければ資料をお送りします！",
    contact: "ご相談の予約ですね！📞\n\nお名前と連絡先をお知らせください！😊",
    thanks: &["ありがとうございます！😊 他にもご質問があればいつでもどうぞ！"],
    fallback: &["お問い合わせありがとうございます！😊 もう少し詳しく教えていただけますか？"],
    quote_pick_service: "どのサービスになさいますか？",
    quote_ready: "お見積もりができました！💰",
    quote_cancelled: "お見積もりをキャンセルしました。他にお手伝いできることはありますか？",
    order_confirmed: "ご注文を受け付けました！🎉 担当者よりご連絡いたします。",
    apology: "申し訳ありません、一時的なエラーが発生しました。もう一度お試しください。",
    collect_name: StepStrings {
        prompt: "お名前を教えてください。",
        error: "お名前を入力してください。",
    },
    collect_email: StepStrings {
        prompt: "ご連絡先のメールアドレスを教えてください。",
        error: "正しいメールアドレスを入力してください。",
    },
    collect_phone: StepStrings {
        prompt: "お電話番号を教えてください。",
        error: "正しい電話番号を入力してください。",
    },
    collect_details: StepStrings {
        prompt: "最後に、ご希望の内容を簡単に教えてください。",
        error: "ご依頼内容を入力してください。",
    },
    quick: QuickReplySets {
        welcome: &["ウェブ制作", "アプリ開発", "AIソリューション", "見積もり"],
        services: &["ウェブサイト", "アプリ", "AI", "デザイン"],
        quoting: &["オプション追加", "見積もり確定", "キャンセル"],
        after_cancel: &["サービスを見る", "最初から"],
        after_order: &["他のサービス", "最初から"],
        fallback: &["サービス案内", "見積もり", "相談予約"],
    },
    card: CardLabels {
        quote_title: "📋 お見積もり",
        total: "合計",
        order_title: "📦 ご注文内容",
        order_number: "注文番号",
        name: "ご担当者",
        email: "メール",
        phone: "お電話",
        amount: "お見積額",
        currency_suffix: "ウォン",
    },
};

static ZH: LocalePack = LocalePack {
    welcome: "您好！😊 有什么可以帮您？",
    greeting: &["您好！😊 网站、应用、AI解决方案，欢迎随时咨询！"],
    service_overview: "我们提供的服务 🌟\n\n🌐 网站开发\n📱 应用开发\n🤖 AI解决方案\n🎨 设计\n\n您对哪项服务感兴趣？",
    website: "您对网站开发感兴趣！👍\n\n📦 Basic（5页以内，2周）\n📦 Professional（10页以内，3周）\n📦 电商网站（含支付，4周）\n\n告诉我您的预算，我来为您报价！💰",
    app: "感谢咨询应用开发！📱\n\n📦 混合应用（iOS/Android，6周）\n📦 原生应用（8周）\n\n您想做什么类型的应用？",
    ai_solution: "您对AI感兴趣！🤖\n\n📦 AI聊天机器人\n📦 流程自动化\n\n您想自动化什么业务？",
    design: "感谢咨询设计服务！🎨\n\n📦 UI/UX设计\n📦 品牌设计\n\n您需要什么设计？",
    price_inquiry: "感谢您的报价咨询！💰\n\n请告诉我您需要哪项服务。（网站/应用/AI/设计）",
    portfolio: "想了解我们的案例！📂\n\n✅ 100+ 网站\n✅ 50+ 应用\n✅ 30+ AI项目\n\n留下联系方式，我们会发送详细资料！",
    contact: "想预约咨询！📞\n\n请留下您的姓名和联系方式，我们会尽快联系您！😊",
    thanks: &["谢谢！😊 有其他问题随时问我！"],
    fallback: &["感谢咨询！😊 请再具体说明一下，我来为您推荐合适的方案。"],
    quote_pick_service: "您想选择哪项服务？",
    quote_ready: "您的报价已准备好！💰",
    quote_cancelled: "已取消报价。还有什么可以帮您？",
    order_confirmed: "订单已收到！🎉 我们的顾问会尽快与您联系。",
    apology: "抱歉，发生了临时错误，请重试。",
    collect_name: StepStrings {
        prompt: "请问您的姓名？",
        error: "请输入您的姓名。",
    },
    collect_email: StepStrings {
        prompt: "请问您的联系邮箱？",
        error: "请输入有效的邮箱地址。",
    },
    collect_phone: StepStrings {
        prompt: "请问您的电话号码？",
        error: "请输入有效的电话号码。",
    },
    collect_details: StepStrings {
        prompt: "最后，请简单描述您的需求。",
        error: "请输入您的需求。",
    },
    quick: QuickReplySets {
        welcome: &["网站开发", "应用开发", "AI解决方案", "获取报价"],
        services: &["网站", "应用", "AI", "设计"],
        quoting: &["添加选项", "确认报价", "取消"],
        after_cancel: &["查看服务", "重新开始"],
        after_order: &["其他服务", "重新开始"],
        fallback: &["服务介绍", "获取报价", "预约咨询"],
    },
    card: CardLabels {
        quote_title: "📋 报价单",
        total: "总计",
        order_title: "📦 订单确认",
        order_number: "订单号",
        name: "联系人",
        email: "邮箱",
        phone: "电话",
        amount: "报价金额",
        currency_suffix: "韩元",
    },
};
