use crate::model::Language;

/// User-facing text in one language
pub struct Strings {
    pub start: &'static str,
    pub set_command: &'static str,
    pub pos_command: &'static str,
    pub monitor_command: &'static str,
    pub stop_command: &'static str,
    pub language_prompt: &'static str,
    pub wallets_prompt: &'static str,
    pub wallets_saved: &'static str,
    pub no_wallets: &'static str,
    pub threshold_prompt: &'static str,
    pub invalid_threshold: &'static str,
    pub interval_prompt: &'static str,
    pub invalid_interval: &'static str,
    pub monitoring_started: &'static str,
    pub monitoring_stopped: &'static str,
    pub request_sent: &'static str,
    pub unknown_command: &'static str,
    pub network: &'static str,
    pub position: &'static str,
    pub health: &'static str,
    pub debt: &'static str,
    pub oracle_price: &'static str,
    pub soft_liquidation: &'static str,
    pub no_positions: &'static str,
    /// `{market_name}` and `{threshold}` are substituted
    pub health_alert: &'static str,
    pub borrow_apy: &'static str,
}

static EN: Strings = Strings {
    start: "Hello! I'm a bot for monitoring Curve Lend positions.\nHere's what I can do:",
    set_command: "Set wallets",
    pos_command: "Current positions",
    monitor_command: "Monitor positions",
    stop_command: "Stop monitoring",
    language_prompt: "Please select your language / Пожалуйста, выберите ваш язык: en / ru",
    wallets_prompt: "Send a wallet or list of wallets separated by commas for tracking.",
    wallets_saved: "Wallets saved.",
    no_wallets: "No wallets set. Use the /set command to set up wallets.",
    threshold_prompt: "Enter the health threshold for notifications (e.g., 5.0).",
    invalid_threshold: "Invalid format. Please enter a number.",
    interval_prompt: "Threshold saved. Enter the interval for repeated notifications in hours (0 - do not repeat).",
    invalid_interval: "Invalid format. Please enter an integer.",
    monitoring_started: "Monitoring settings completed. Monitoring started.",
    monitoring_stopped: "Monitoring stopped.",
    request_sent: "Request sent, please wait...",
    unknown_command: "Unknown command. Use /set, /pos, /monitor or /stop.",
    network: "Network",
    position: "Position",
    health: "Health",
    debt: "Debt",
    oracle_price: "Oracle Price",
    soft_liquidation: "Soft Liquidation",
    no_positions: "No active positions found.",
    health_alert: "Health of the position {market_name} has fallen below {threshold}.",
    borrow_apy: "Borrow APY",
};

static RU: Strings = Strings {
    start: "Привет! Я бот для мониторинга позиций Curve Lend.\nВот что я могу делать:",
    set_command: "Настройка кошельков",
    pos_command: "Текущие позиции",
    monitor_command: "Мониторинг позиций",
    stop_command: "Остановить мониторинг",
    language_prompt: "Please select your language / Пожалуйста, выберите ваш язык: en / ru",
    wallets_prompt: "Отправьте кошелек или список кошельков через запятую для отслеживания.",
    wallets_saved: "Кошельки сохранены.",
    no_wallets: "Кошельки не настроены. Используйте команду /set для настройки.",
    threshold_prompt: "Введите порог health для уведомлений (например, 5.0).",
    invalid_threshold: "Неверный формат. Введите число.",
    interval_prompt: "Порог сохранен. Введите интервал повторных уведомлений в часах (0 — не повторять).",
    invalid_interval: "Неверный формат. Введите целое число.",
    monitoring_started: "Настройки мониторинга завершены. Мониторинг запущен.",
    monitoring_stopped: "Мониторинг остановлен.",
    request_sent: "Запрос отправлен, пожалуйста, подождите...",
    unknown_command: "Неизвестная команда. Используйте /set, /pos, /monitor или /stop.",
    network: "Сеть",
    position: "Позиция",
    health: "Здоровье",
    debt: "Долг",
    oracle_price: "Oracle Price",
    soft_liquidation: "Soft Liquidation",
    no_positions: "Активные позиции не найдены.",
    health_alert: "Health позиции {market_name} упал ниже {threshold}.",
    borrow_apy: "APY займа",
};

pub fn strings(language: Language) -> &'static Strings {
    match language {
        Language::En => &EN,
        Language::Ru => &RU,
    }
}

/// Help text listing the bot commands
pub fn command_list(language: Language) -> String {
    let s = strings(language);
    format!(
        "{}\n/set — {}\n/pos — {}\n/monitor — {}\n/stop — {}",
        s.start, s.set_command, s.pos_command, s.monitor_command, s.stop_command
    )
}
