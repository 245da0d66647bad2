// Upstream URL builders

pub const DDRAGON_BASE: &str = "https://ddragon.leagueoflegends.com";
pub const BIGBRAIN_BASE: &str = "https://static.bigbrain.gg/assets/lol/riot_static";
pub const UGG_API: &str = "https://u.gg/api";
pub const YOUTUBE_SEARCH: &str = "https://www.googleapis.com/youtube/v3/search";
pub const SKILL_ORDER_PRIMARY_BASE: &str = "https://www.leagueofgraphs.com/champions/skills-orders";
pub const SKILL_ORDER_SECONDARY_BASE: &str = "https://www.metasrc.com/lol/build";

pub fn versions() -> String {
    format!("{}/api/versions.json", DDRAGON_BASE)
}

pub fn champion_list(version: &str, locale: &str) -> String {
    format!("{}/cdn/{}/data/{}/champion.json", DDRAGON_BASE, version, locale)
}

pub fn champion_detail(version: &str, locale: &str, key: &str) -> String {
    format!("{}/cdn/{}/data/{}/champion/{}.json", DDRAGON_BASE, version, locale, key)
}

pub fn bigbrain_champion_detail(version: &str, locale: &str, key: &str) -> String {
    format!("{}/{}/data/{}/champion/{}.json", BIGBRAIN_BASE, version, locale, key)
}

pub fn spell_icon(version: &str, file: &str) -> String {
    format!("{}/cdn/{}/img/spell/{}", DDRAGON_BASE, version, file)
}

pub fn passive_icon(version: &str, file: &str) -> String {
    format!("{}/cdn/{}/img/passive/{}", DDRAGON_BASE, version, file)
}

pub fn ugg_live_game_referer(region: &str, game_name: &str, tag_line: &str) -> String {
    format!(
        "https://u.gg/lol/profile/{}/{}-{}/live-game",
        region,
        game_name,
        tag_line.to_lowercase()
    )
}

pub fn skill_order_primary(slug: &str) -> String {
    format!("{}/{}", SKILL_ORDER_PRIMARY_BASE, slug)
}

pub fn skill_order_secondary(slug: &str) -> String {
    format!("{}/{}", SKILL_ORDER_SECONDARY_BASE, slug)
}
