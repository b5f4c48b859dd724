//! Release filename parsing.
//!
//! Extracts resolution, source quality, encode, HDR/audio tags, languages,
//! release group, title, year and season/episode numbers from scene-style
//! names such as `Movie.Name.2021.2160p.WEB-DL.DV.HDR10.DDP5.1.Atmos.x265-GRP.mkv`.
//!
//! The [`NameParser`] trait is the seam: hosts with a richer parser plug it
//! into [`crate::normalize::StreamNormalizer`] instead of [`FilenameParser`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Metadata extracted from a filename or release title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedNameData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub seasons: Vec<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub episodes: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encode: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub visual_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub audio_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
}

/// Turns a filename into [`ParsedNameData`].
pub trait NameParser: Send + Sync {
    /// Returns `None` when nothing usable can be read from `filename`.
    fn parse(&self, filename: &str) -> Option<ParsedNameData>;
}

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($pattern).unwrap());
    };
}

re!(EXTENSION, r"(?i)\.(mkv|mp4|avi|m4v|ts|webm|mov|wmv|iso)$");
re!(RESOLUTION, r"(?i)\b(2160p|4k|uhd|1440p|1080p|1080i|720p|576p|480p|360p|240p)\b");
re!(YEAR, r"\b(19[0-9]{2}|20[0-9]{2})\b");
re!(SEASON_EPISODE, r"(?i)\bS(\d{1,2})[ .]?E(\d{1,3})(?:-?E(\d{1,3}))?\b");
re!(SEASON_ONLY, r"(?i)\b(?:S|Season )(\d{1,2})\b");
re!(RELEASE_GROUP, r"-([A-Za-z0-9]+)$");

re!(REMUX, r"(?i)\bremux\b");
re!(BLURAY, r"(?i)\b(blu-?ray|bdrip|brrip|bd)\b");
re!(WEB_DL, r"(?i)\bweb-?dl\b");
re!(WEBRIP, r"(?i)\bweb-?rip\b");
re!(HDRIP, r"(?i)\bhd-?rip\b");
re!(HDTV, r"(?i)\bhdtv\b");
re!(DVDRIP, r"(?i)\bdvd-?rip\b");
re!(CAM, r"(?i)\b(cam|hdcam|camrip)\b");
re!(TELESYNC, r"(?i)\b(ts|telesync|hdts)\b");
re!(SCREENER, r"(?i)\b(scr|screener|dvdscr)\b");

re!(HEVC, r"(?i)\b(hevc|[xh][ .]?265)\b");
re!(AVC, r"(?i)\b(avc|[xh][ .]?264)\b");
re!(AV1, r"(?i)\bav1\b");
re!(XVID, r"(?i)\bxvid\b");

re!(HDR10_PLUS, r"(?i)\bhdr10(\+|plus)");
re!(HDR10, r"(?i)\bhdr10\b");
re!(HDR, r"(?i)\bhdr\b");
re!(DOLBY_VISION, r"(?i)\b(dv|dovi|dolby vision)\b");
re!(TEN_BIT, r"(?i)\b10[ .-]?bit\b");
re!(IMAX, r"(?i)\bimax\b");

re!(ATMOS, r"(?i)\batmos\b");
re!(TRUEHD, r"(?i)\btrue-?hd\b");
re!(DTS_HD, r"(?i)\bdts-?(hd|x)\b");
re!(DTS, r"(?i)\bdts\b");
re!(DDP, r"(?i)\b(ddp|dd\+|e-?ac-?3)");
re!(DD, r"(?i)\b(dd|ac-?3)\d?\b");
re!(AAC, r"(?i)\baac");
re!(FLAC, r"(?i)\bflac\b");
re!(OPUS, r"(?i)\bopus\b");

const LANGUAGES: &[(&str, &str)] = &[
    (r"(?i)\bmulti\b", "Multi"),
    (r"(?i)\bdual[ .-]?audio\b", "Dual Audio"),
    (r"(?i)\b(english|eng)\b", "English"),
    (r"(?i)\b(french|fre|vff|vostfr|truefrench)\b", "French"),
    (r"(?i)\b(spanish|spa|castellano|latino)\b", "Spanish"),
    (r"(?i)\b(german|ger|deutsch)\b", "German"),
    (r"(?i)\b(italian|ita)\b", "Italian"),
    (r"(?i)\b(portuguese|por|dublado)\b", "Portuguese"),
    (r"(?i)\b(russian|rus)\b", "Russian"),
    (r"(?i)\b(japanese|jpn)\b", "Japanese"),
    (r"(?i)\b(korean|kor)\b", "Korean"),
    (r"(?i)\b(hindi|hin)\b", "Hindi"),
];

static LANGUAGE_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    LANGUAGES
        .iter()
        .map(|(pattern, label)| (Regex::new(pattern).unwrap(), *label))
        .collect()
});

/// Regex based [`NameParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameParser;

impl FilenameParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn quality(name: &str) -> Option<&'static str> {
        let bluray = BLURAY.is_match(name);
        if REMUX.is_match(name) {
            return Some(if bluray { "BluRay REMUX" } else { "REMUX" });
        }
        [
            (&*BLURAY, "BluRay"),
            (&*WEB_DL, "WEB-DL"),
            (&*WEBRIP, "WEBRip"),
            (&*HDRIP, "HDRip"),
            (&*HDTV, "HDTV"),
            (&*DVDRIP, "DVDRip"),
            (&*CAM, "CAM"),
            (&*TELESYNC, "TS"),
            (&*SCREENER, "SCR"),
        ]
        .into_iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, label)| label)
    }

    fn encode(name: &str) -> Option<&'static str> {
        [(&*HEVC, "HEVC"), (&*AV1, "AV1"), (&*AVC, "AVC"), (&*XVID, "XviD")]
            .into_iter()
            .find(|(re, _)| re.is_match(name))
            .map(|(_, label)| label)
    }

    fn visual_tags(name: &str) -> Vec<String> {
        let mut tags = Vec::new();
        if HDR10_PLUS.is_match(name) {
            tags.push("HDR10+");
        } else if HDR10.is_match(name) {
            tags.push("HDR10");
        } else if HDR.is_match(name) {
            tags.push("HDR");
        }
        if DOLBY_VISION.is_match(name) {
            tags.push("DV");
        }
        if TEN_BIT.is_match(name) {
            tags.push("10bit");
        }
        if IMAX.is_match(name) {
            tags.push("IMAX");
        }
        tags.into_iter().map(String::from).collect()
    }

    fn audio_tags(name: &str) -> Vec<String> {
        let mut tags = Vec::new();
        if ATMOS.is_match(name) {
            tags.push("Atmos");
        }
        if TRUEHD.is_match(name) {
            tags.push("TrueHD");
        }
        if DTS_HD.is_match(name) {
            tags.push("DTS-HD");
        } else if DTS.is_match(name) {
            tags.push("DTS");
        }
        if DDP.is_match(name) {
            tags.push("DD+");
        } else if DD.is_match(name) {
            tags.push("DD");
        }
        if AAC.is_match(name) {
            tags.push("AAC");
        }
        if FLAC.is_match(name) {
            tags.push("FLAC");
        }
        if OPUS.is_match(name) {
            tags.push("OPUS");
        }
        tags.into_iter().map(String::from).collect()
    }

    fn languages(name: &str) -> Vec<String> {
        LANGUAGE_PATTERNS
            .iter()
            .filter(|(re, _)| re.is_match(name))
            .map(|(_, label)| (*label).to_string())
            .collect()
    }

    fn resolution(name: &str) -> Option<String> {
        let found = RESOLUTION.captures(name)?.get(1)?.as_str().to_ascii_lowercase();
        Some(match found.as_str() {
            "4k" | "uhd" => "2160p".to_string(),
            "1080i" => "1080p".to_string(),
            _ => found,
        })
    }
}

impl NameParser for FilenameParser {
    fn parse(&self, filename: &str) -> Option<ParsedNameData> {
        let trimmed = filename.trim();
        if trimmed.is_empty() {
            return None;
        }

        let stem = EXTENSION.replace(trimmed, "");
        let release_group = RELEASE_GROUP
            .captures(&stem)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|g| !g.chars().all(|c| c.is_ascii_digit()));

        // Dots and underscores act as word separators in release names
        let name: String = stem
            .chars()
            .map(|c| if c == '.' || c == '_' { ' ' } else { c })
            .collect();

        let year_match = YEAR.find_iter(&name).find(|m| m.start() > 0);
        let year = year_match.and_then(|m| m.as_str().parse().ok());

        let (seasons, episodes, episode_pos) = match SEASON_EPISODE.captures(&name) {
            Some(caps) => {
                let season = caps.get(1).and_then(|m| m.as_str().parse().ok());
                let first: Option<u32> = caps.get(2).and_then(|m| m.as_str().parse().ok());
                let last: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());
                let episodes = match (first, last) {
                    (Some(a), Some(b)) if b >= a => (a..=b).collect(),
                    (Some(a), _) => vec![a],
                    _ => vec![],
                };
                (season.into_iter().collect(), episodes, caps.get(0).map(|m| m.start()))
            }
            None => match SEASON_ONLY.captures(&name) {
                Some(caps) => (
                    caps.get(1)
                        .and_then(|m| m.as_str().parse().ok())
                        .into_iter()
                        .collect(),
                    vec![],
                    caps.get(0).map(|m| m.start()),
                ),
                None => (vec![], vec![], None),
            },
        };

        let resolution_pos = RESOLUTION.find(&name).map(|m| m.start());
        let title_end = [year_match.map(|m| m.start()), episode_pos, resolution_pos]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(name.len());
        let title = name[..title_end]
            .trim()
            .trim_end_matches(['(', '[', '-'])
            .trim()
            .to_string();

        Some(ParsedNameData {
            title: (!title.is_empty()).then_some(title),
            year,
            seasons,
            episodes,
            resolution: Self::resolution(&name),
            quality: Self::quality(&name).map(String::from),
            encode: Self::encode(&name).map(String::from),
            visual_tags: Self::visual_tags(&name),
            audio_tags: Self::audio_tags(&name),
            languages: Self::languages(&name),
            release_group,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie() {
        let parsed = FilenameParser
            .parse("The.Matrix.1999.2160p.UHD.BluRay.REMUX.HDR10.TrueHD.Atmos.7.1.HEVC-GROUP.mkv")
            .unwrap();
        assert_eq!(parsed.title.as_deref(), Some("The Matrix"));
        assert_eq!(parsed.year, Some(1999));
        assert_eq!(parsed.resolution.as_deref(), Some("2160p"));
        assert_eq!(parsed.quality.as_deref(), Some("BluRay REMUX"));
        assert_eq!(parsed.encode.as_deref(), Some("HEVC"));
        assert_eq!(parsed.visual_tags, vec!["HDR10"]);
        assert_eq!(parsed.audio_tags, vec!["Atmos", "TrueHD"]);
        assert_eq!(parsed.release_group.as_deref(), Some("GROUP"));
    }

    #[test]
    fn test_parse_episode() {
        let parsed = FilenameParser
            .parse("Show_Name_S02E05_1080p_WEB-DL_DDP5.1_H.264-NTb.mkv")
            .unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Show Name"));
        assert_eq!(parsed.seasons, vec![2]);
        assert_eq!(parsed.episodes, vec![5]);
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
        assert_eq!(parsed.quality.as_deref(), Some("WEB-DL"));
        assert_eq!(parsed.encode.as_deref(), Some("AVC"));
        assert_eq!(parsed.audio_tags, vec!["DD+"]);
    }

    #[test]
    fn test_parse_episode_range() {
        let parsed = FilenameParser.parse("Show.S01E01-E03.720p.HDTV.x264").unwrap();
        assert_eq!(parsed.episodes, vec![1, 2, 3]);
        assert_eq!(parsed.quality.as_deref(), Some("HDTV"));
    }

    #[test]
    fn test_hdr10_plus_and_dolby_vision() {
        let parsed = FilenameParser
            .parse("Film.2023.2160p.WEB-DL.DV.HDR10+.DDP5.1.Atmos.H.265-FLUX")
            .unwrap();
        assert_eq!(parsed.visual_tags, vec!["HDR10+", "DV"]);
        assert_eq!(parsed.release_group.as_deref(), Some("FLUX"));
    }

    #[test]
    fn test_languages() {
        let parsed = FilenameParser
            .parse("Film.2020.MULTi.VFF.1080p.BluRay.x264")
            .unwrap();
        assert_eq!(parsed.languages, vec!["Multi", "French"]);
    }

    #[test]
    fn test_title_only() {
        let parsed = FilenameParser.parse("Some Home Video").unwrap();
        assert_eq!(parsed.title.as_deref(), Some("Some Home Video"));
        assert!(parsed.resolution.is_none());
        assert!(parsed.quality.is_none());
    }

    #[test]
    fn test_blank_is_unparseable() {
        assert!(FilenameParser.parse("").is_none());
        assert!(FilenameParser.parse("   ").is_none());
    }

    #[test]
    fn test_year_at_start_is_title() {
        let parsed = FilenameParser.parse("2012.2009.1080p.BluRay").unwrap();
        assert_eq!(parsed.title.as_deref(), Some("2012"));
        assert_eq!(parsed.year, Some(2009));
    }
}
