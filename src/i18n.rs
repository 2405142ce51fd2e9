//! User-facing message catalog.
//!
//! Every string the client shows to a person comes from here so the GUI and
//! the CLI agree on wording. The site itself is Traditional Chinese; English is
//! the default for the client.

use serde::{Deserialize, Serialize};

/// Supported locale codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Locale {
    /// Parse a locale code, falling back to English for anything unknown
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "zh-tw" | "zh_tw" | "zh-hant" | "zh" => Locale::ZhTw,
            _ => Locale::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhTw => "zh-TW",
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::ZhTw => &ZH_TW,
        }
    }
}

/// A complete set of user-facing strings for one locale
#[derive(Debug)]
pub struct Messages {
    /// Text on the busy overlay
    pub busy: &'static str,
    /// Generic transport failure
    pub network_error: &'static str,
    /// Fallback when a non-2xx response has neither message nor reason phrase
    pub request_failed: &'static str,
    /// Fallback when a failed toggle has no message at all
    pub action_failed: &'static str,
    /// Button label while a toggle request is in flight
    pub toggle_loading: &'static str,

    pub favorite_on_label: &'static str,
    pub favorite_off_label: &'static str,
    pub favorite_on_status: &'static str,
    pub favorite_off_status: &'static str,
    pub favorite_added: &'static str,
    pub favorite_removed: &'static str,

    pub garage_on_label: &'static str,
    pub garage_off_label: &'static str,
    pub garage_on_status: &'static str,
    pub garage_off_status: &'static str,
    pub garage_added: &'static str,
    pub garage_removed: &'static str,
    pub garage_remove_confirm: &'static str,

    /// Prefix of a pushed new-post alert
    pub new_post: &'static str,
    /// Subject used when a new-post frame names no vehicle
    pub default_vehicle: &'static str,
    /// Title used when a new-post frame has no title
    pub default_post_title: &'static str,

    pub rating_thanks: &'static str,
    pub rating_updated: &'static str,
    pub comment_sent: &'static str,

    /// Rejected before sending: score outside 1..=5
    pub score_out_of_range: &'static str,
    /// Rejected before sending: blank comment
    pub comment_empty: &'static str,
    /// Prefix for an image file that could not be read
    pub image_unreadable: &'static str,
    pub invalid_vehicle_id: &'static str,
    pub invalid_post_id: &'static str,

    // Window chrome
    pub section_vehicle: &'static str,
    pub section_collections: &'static str,
    pub section_rating: &'static str,
    pub section_comments: &'static str,
    pub vehicle_id_label: &'static str,
    pub vehicle_id_hint: &'static str,
    pub open_button: &'static str,
    pub no_controls: &'static str,
    pub rate_button: &'static str,
    pub average_label: &'static str,
    pub post_id_label: &'static str,
    pub comment_hint: &'static str,
    pub image_url_label: &'static str,
    pub send_button: &'static str,
    pub reply_button: &'static str,
    pub reply_hint: &'static str,
    pub alerts_on: &'static str,
    pub alerts_closed: &'static str,
    pub alerts_off: &'static str,
    pub theme_light: &'static str,
    pub theme_dark: &'static str,
    pub confirm_title: &'static str,
    pub notice_title: &'static str,
    pub ok_button: &'static str,
    pub cancel_button: &'static str,
    pub close_button: &'static str,
    pub about_button: &'static str,
    pub about_title: &'static str,
    pub about_tagline: &'static str,
    pub version_label: &'static str,
    pub built_with: &'static str,
}

static EN: Messages = Messages {
    busy: "Working...",
    network_error: "A network or system error occurred, please try again later.",
    request_failed: "Request failed",
    action_failed: "The action failed, please try again later.",
    toggle_loading: "⏳ Working...",

    favorite_on_label: "⭐ In my favorites",
    favorite_off_label: "☆ Add to favorites",
    favorite_on_status: "Added to your favorites, find it quickly from your list.",
    favorite_off_status: "Like this vehicle? Add it to your favorites so you won't forget it.",
    favorite_added: "Added to your favorites!",
    favorite_removed: "Removed from your favorites.",

    garage_on_label: "❤️ In my garage",
    garage_off_label: "🤍 Add to my garage",
    garage_on_status: "In your garage: manage notes and photos from \"My garage\".",
    garage_off_status: "If this is your ride, add it to your garage to keep it all in one place.",
    garage_added: "Added to your garage!",
    garage_removed: "Removed from your garage.",
    garage_remove_confirm: "Remove this vehicle from your garage?",

    new_post: "New post",
    default_vehicle: "Vehicle",
    default_post_title: "New share",

    rating_thanks: "Thanks for rating!",
    rating_updated: "Rating updated!",
    comment_sent: "Comment posted!",

    score_out_of_range: "Please choose a score between 1 and 5.",
    comment_empty: "Please write something before sending.",
    image_unreadable: "Could not read the image",
    invalid_vehicle_id: "Not a vehicle id",
    invalid_post_id: "Not a post id",

    section_vehicle: "Vehicle",
    section_collections: "Collections",
    section_rating: "Rating",
    section_comments: "Comments",
    vehicle_id_label: "Vehicle id:",
    vehicle_id_hint: "e.g. 42",
    open_button: "Open",
    no_controls: "This page has no membership controls",
    rate_button: "Rate",
    average_label: "Average",
    post_id_label: "Post id:",
    comment_hint: "Write a comment",
    image_url_label: "Image URL:",
    send_button: "Send",
    reply_button: "Reply",
    reply_hint: "Write a reply",
    alerts_on: "Live alerts on",
    alerts_closed: "Live alerts disconnected",
    alerts_off: "Live alerts off",
    theme_light: "Light",
    theme_dark: "Dark",
    confirm_title: "Confirm",
    notice_title: "Notice",
    ok_button: "OK",
    cancel_button: "Cancel",
    close_button: "Close",
    about_button: "About",
    about_title: "About Motry",
    about_tagline: "Vehicle community client",
    version_label: "Version",
    built_with: "Built with Rust + egui",
};

static ZH_TW: Messages = Messages {
    busy: "處理中...",
    network_error: "網路或系統發生錯誤，請稍後再試。",
    request_failed: "請求失敗",
    action_failed: "操作失敗，請稍後再試。",
    toggle_loading: "⏳ 處理中...",

    favorite_on_label: "⭐ 已在我的最愛",
    favorite_off_label: "☆ 加入我的最愛",
    favorite_on_status: "已加入我的最愛，可於清單中快速找到它。",
    favorite_off_status: "喜歡這台車嗎？加入我的最愛就不會忘記。",
    favorite_added: "已加入我的最愛！",
    favorite_removed: "已從我的最愛移除。",

    garage_on_label: "❤️ 已在我的車庫",
    garage_off_label: "🤍 加入我的車庫",
    garage_on_status: "已加入車庫，可在「我的車庫」管理備註與照片。",
    garage_off_status: "如果這是你的座駕，可加入我的車庫集中管理。",
    garage_added: "已加入我的車庫！",
    garage_removed: "已從車庫中移除。",
    garage_remove_confirm: "確定要從車庫中移除嗎？",

    new_post: "新貼文",
    default_vehicle: "車輛",
    default_post_title: "新分享",

    rating_thanks: "感謝你的評分!",
    rating_updated: "評分已更新!",
    comment_sent: "留言已送出!",

    score_out_of_range: "請選擇 1 到 5 之間的評分。",
    comment_empty: "請先輸入留言內容。",
    image_unreadable: "無法讀取圖片",
    invalid_vehicle_id: "無效的車輛編號",
    invalid_post_id: "無效的貼文編號",

    section_vehicle: "車輛",
    section_collections: "收藏",
    section_rating: "評分",
    section_comments: "留言",
    vehicle_id_label: "車輛編號：",
    vehicle_id_hint: "例如 42",
    open_button: "開啟",
    no_controls: "此頁面沒有收藏按鈕",
    rate_button: "評分",
    average_label: "平均",
    post_id_label: "貼文編號：",
    comment_hint: "寫下你的留言",
    image_url_label: "圖片網址：",
    send_button: "送出",
    reply_button: "回覆",
    reply_hint: "寫下你的回覆",
    alerts_on: "即時通知已開啟",
    alerts_closed: "即時通知已中斷",
    alerts_off: "即時通知已關閉",
    theme_light: "淺色",
    theme_dark: "深色",
    confirm_title: "確認",
    notice_title: "提示",
    ok_button: "確定",
    cancel_button: "取消",
    close_button: "關閉",
    about_button: "關於",
    about_title: "關於 Motry",
    about_tagline: "汽車社群用戶端",
    version_label: "版本",
    built_with: "以 Rust + egui 打造",
};
