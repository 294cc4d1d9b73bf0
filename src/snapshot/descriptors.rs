//! Static labels and glyphs for every snapshot field.

use super::FieldKey;
use crate::locale::Locale;

/// Human-readable labels and a decorative glyph for one field.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub id: &'static str,
    pub ru: &'static str,
    pub en: &'static str,
    pub glyph: &'static str,
}

impl FieldDescriptor {
    pub fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ru => self.ru,
            Locale::En => self.en,
        }
    }
}

/// Indexed by `FieldKey as usize`.
pub static DESCRIPTORS: [FieldDescriptor; 41] = [
    FieldDescriptor {
        key: FieldKey::Ip,
        id: "ip",
        ru: "IP-адрес",
        en: "IP Address",
        glyph: "🌍",
    },
    FieldDescriptor {
        key: FieldKey::Country,
        id: "country",
        ru: "Страна",
        en: "Country",
        glyph: "🇳🇱",
    },
    FieldDescriptor {
        key: FieldKey::Region,
        id: "region",
        ru: "Регион",
        en: "Region",
        glyph: "🏞️",
    },
    FieldDescriptor {
        key: FieldKey::City,
        id: "city",
        ru: "Город",
        en: "City",
        glyph: "🏙️",
    },
    FieldDescriptor {
        key: FieldKey::Postal,
        id: "postal",
        ru: "Почтовый индекс",
        en: "Postal Code",
        glyph: "📮",
    },
    FieldDescriptor {
        key: FieldKey::Latitude,
        id: "latitude",
        ru: "Широта",
        en: "Latitude",
        glyph: "📏",
    },
    FieldDescriptor {
        key: FieldKey::Longitude,
        id: "longitude",
        ru: "Долгота",
        en: "Longitude",
        glyph: "📐",
    },
    FieldDescriptor {
        key: FieldKey::Isp,
        id: "isp",
        ru: "Провайдер",
        en: "ISP",
        glyph: "📡",
    },
    FieldDescriptor {
        key: FieldKey::Asn,
        id: "asn",
        ru: "ASN",
        en: "ASN",
        glyph: "🔢",
    },
    FieldDescriptor {
        key: FieldKey::Hostname,
        id: "hostname",
        ru: "Хостнейм",
        en: "Hostname",
        glyph: "💻",
    },
    FieldDescriptor {
        key: FieldKey::UserAgent,
        id: "userAgent",
        ru: "User-Agent",
        en: "User-Agent",
        glyph: "🖥️",
    },
    FieldDescriptor {
        key: FieldKey::Browser,
        id: "browser",
        ru: "Браузер",
        en: "Browser",
        glyph: "🌐",
    },
    FieldDescriptor {
        key: FieldKey::BrowserVersion,
        id: "browserVersion",
        ru: "Версия браузера",
        en: "Browser Version",
        glyph: "🔖",
    },
    FieldDescriptor {
        key: FieldKey::Platform,
        id: "platform",
        ru: "Платформа",
        en: "Platform",
        glyph: "🛠️",
    },
    FieldDescriptor {
        key: FieldKey::Os,
        id: "os",
        ru: "ОС",
        en: "OS",
        glyph: "💿",
    },
    FieldDescriptor {
        key: FieldKey::Languages,
        id: "languages",
        ru: "Языки",
        en: "Languages",
        glyph: "🗣️",
    },
    FieldDescriptor {
        key: FieldKey::ScreenResolution,
        id: "screenResolution",
        ru: "Разрешение экрана",
        en: "Screen Resolution",
        glyph: "🖼️",
    },
    FieldDescriptor {
        key: FieldKey::Viewport,
        id: "viewport",
        ru: "Область просмотра",
        en: "Viewport",
        glyph: "👁️",
    },
    FieldDescriptor {
        key: FieldKey::PixelRatio,
        id: "pixelRatio",
        ru: "Пиксельный коэффициент",
        en: "Pixel Ratio",
        glyph: "🔍",
    },
    FieldDescriptor {
        key: FieldKey::ColorDepth,
        id: "colorDepth",
        ru: "Глубина цвета",
        en: "Color Depth",
        glyph: "🎨",
    },
    FieldDescriptor {
        key: FieldKey::DeviceMemory,
        id: "deviceMemory",
        ru: "Память устройства",
        en: "Device Memory",
        glyph: "🧠",
    },
    FieldDescriptor {
        key: FieldKey::CpuCores,
        id: "cpuCores",
        ru: "Ядра процессора",
        en: "CPU Cores",
        glyph: "⚙️",
    },
    FieldDescriptor {
        key: FieldKey::CookiesEnabled,
        id: "cookiesEnabled",
        ru: "Куки включены",
        en: "Cookies Enabled",
        glyph: "🍪",
    },
    FieldDescriptor {
        key: FieldKey::DoNotTrack,
        id: "doNotTrack",
        ru: "Не отслеживать",
        en: "Do Not Track",
        glyph: "🚫",
    },
    FieldDescriptor {
        key: FieldKey::TimeZone,
        id: "timeZone",
        ru: "Часовой пояс",
        en: "Time Zone",
        glyph: "⏳",
    },
    FieldDescriptor {
        key: FieldKey::LocalTime,
        id: "localTime",
        ru: "Местное время",
        en: "Local Time",
        glyph: "⏰",
    },
    FieldDescriptor {
        key: FieldKey::Uptime,
        id: "uptime",
        ru: "Время работы",
        en: "Uptime",
        glyph: "⌛",
    },
    FieldDescriptor {
        key: FieldKey::Plugins,
        id: "plugins",
        ru: "Плагины",
        en: "Plugins",
        glyph: "🔧",
    },
    FieldDescriptor {
        key: FieldKey::MimeTypes,
        id: "mimeTypes",
        ru: "MIME-типы",
        en: "MIME Types",
        glyph: "📜",
    },
    FieldDescriptor {
        key: FieldKey::TouchSupport,
        id: "touchSupport",
        ru: "Сенсорный ввод",
        en: "Touch Support",
        glyph: "👆",
    },
    FieldDescriptor {
        key: FieldKey::WebglVendor,
        id: "webglVendor",
        ru: "WebGL Vendor",
        en: "WebGL Vendor",
        glyph: "🎮",
    },
    FieldDescriptor {
        key: FieldKey::Connection,
        id: "connection",
        ru: "Соединение",
        en: "Connection",
        glyph: "📶",
    },
    FieldDescriptor {
        key: FieldKey::PageLoadTime,
        id: "pageLoadTime",
        ru: "Время загрузки",
        en: "Page Load Time",
        glyph: "⚡",
    },
    FieldDescriptor {
        key: FieldKey::DnsLookup,
        id: "dnsLookup",
        ru: "DNS-запрос",
        en: "DNS Lookup",
        glyph: "🔎",
    },
    FieldDescriptor {
        key: FieldKey::TcpConnect,
        id: "tcpConnect",
        ru: "TCP-соединение",
        en: "TCP Connect",
        glyph: "🔗",
    },
    FieldDescriptor {
        key: FieldKey::RequestTime,
        id: "requestTime",
        ru: "Время запроса",
        en: "Request Time",
        glyph: "📩",
    },
    FieldDescriptor {
        key: FieldKey::BatteryLevel,
        id: "batteryLevel",
        ru: "Уровень батареи",
        en: "Battery Level",
        glyph: "🔋",
    },
    FieldDescriptor {
        key: FieldKey::BatteryCharging,
        id: "batteryCharging",
        ru: "Зарядка",
        en: "Charging",
        glyph: "🔌",
    },
    FieldDescriptor {
        key: FieldKey::BatteryChargeTime,
        id: "batteryChargeTime",
        ru: "Время до зарядки",
        en: "Charge Time",
        glyph: "⏱️",
    },
    FieldDescriptor {
        key: FieldKey::BatteryDischargeTime,
        id: "batteryDischargeTime",
        ru: "Время разрядки",
        en: "Discharge Time",
        glyph: "🔋",
    },
    FieldDescriptor {
        key: FieldKey::LocalIps,
        id: "localIPs",
        ru: "Локальные IP",
        en: "Local IPs",
        glyph: "🏠",
    },
];
