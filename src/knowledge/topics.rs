use serde::{Deserialize, Serialize};

use crate::analysis::BiasLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    BotDetection,
    Hooks,
    Storytelling,
    Algorithm,
    Hashtags,
    Engagement,
    Persuasion,
    BodyLanguage,
    Language,
    CognitiveBias,
    Ethics,
    Monetization,
    CommunicationGeneral,
    OutOfScope,
}

impl Topic {
    /// Routing order; the first topic with a matching keyword wins.
    pub const PRIORITY: [Topic; 13] = [
        Topic::BotDetection,
        Topic::Hooks,
        Topic::Storytelling,
        Topic::Algorithm,
        Topic::Hashtags,
        Topic::Engagement,
        Topic::Persuasion,
        Topic::BodyLanguage,
        Topic::Language,
        Topic::CognitiveBias,
        Topic::Ethics,
        Topic::Monetization,
        Topic::CommunicationGeneral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::BotDetection => "bot-detection",
            Topic::Hooks => "hooks",
            Topic::Storytelling => "storytelling",
            Topic::Algorithm => "algorithm",
            Topic::Hashtags => "hashtags",
            Topic::Engagement => "engagement",
            Topic::Persuasion => "persuasion",
            Topic::BodyLanguage => "body-language",
            Topic::Language => "language",
            Topic::CognitiveBias => "cognitive-bias",
            Topic::Ethics => "ethics",
            Topic::Monetization => "monetization",
            Topic::CommunicationGeneral => "communication-general",
            Topic::OutOfScope => "out-of-scope",
        }
    }

    pub fn layer(&self) -> Option<BiasLayer> {
        match self {
            Topic::BotDetection | Topic::Ethics => Some(BiasLayer::Eth),
            Topic::Hooks | Topic::CognitiveBias => Some(BiasLayer::Cog),
            Topic::Storytelling | Topic::Language => Some(BiasLayer::Nlp),
            Topic::Algorithm | Topic::Hashtags => Some(BiasLayer::Eco),
            Topic::Engagement => Some(BiasLayer::Soc),
            Topic::Persuasion => Some(BiasLayer::Epm),
            Topic::BodyLanguage => Some(BiasLayer::Vbm),
            Topic::Monetization => Some(BiasLayer::Bmil),
            Topic::CommunicationGeneral | Topic::OutOfScope => None,
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::BotDetection => &[
                "bot", "bots", "fake followers", "fake follower", "bought followers", "buy followers",
                "follower farm", "inauthentic", "fake account", "fake likes",
            ],
            Topic::Hooks => &[
                "hook", "hooks", "first seconds", "first 3 seconds", "opening line", "grab attention",
                "scroll stopper", "stop scrolling", "intro",
            ],
            Topic::Storytelling => &[
                "story", "stories", "storytelling", "narrative", "plot", "character", "arc",
                "beginning middle end",
            ],
            Topic::Algorithm => &[
                "algorithm", "for you page", "fyp", "reach", "views dropped", "shadowban",
                "shadow ban", "posting time", "when to post", "how often",
            ],
            Topic::Hashtags => &["hashtag", "hashtags", "tags", "keywords", "seo"],
            Topic::Engagement => &[
                "engagement", "engagement rate", "comments", "likes", "shares", "saves",
                "interaction", "community", "followers grow", "grow followers",
            ],
            Topic::Persuasion => &[
                "persuade", "persuasion", "convince", "emotion", "emotional", "trigger",
                "influence", "call to action", "cta",
            ],
            Topic::BodyLanguage => &[
                "body language", "gesture", "gestures", "eye contact", "posture", "facial expression",
                "camera presence", "on camera", "voice tone", "lighting",
            ],
            Topic::Language => &[
                "words", "wording", "caption", "captions", "script", "copywriting", "nlp",
                "tone of voice", "vocabulary", "sentence",
            ],
            Topic::CognitiveBias => &[
                "bias", "biases", "cognitive", "anchoring", "scarcity", "fomo", "social proof",
                "attention span", "retention", "psychology",
            ],
            Topic::Ethics => &[
                "ethics", "ethical", "manipulation", "manipulative", "clickbait", "honest",
                "honesty", "trust", "authentic", "authenticity", "disclosure",
            ],
            Topic::Monetization => &[
                "monetize", "monetization", "brand deal", "brand deals", "sponsorship", "sponsor",
                "money", "income", "affiliate", "sell", "sales", "creator fund",
            ],
            // Bare question words (how, why, what) never route here.
            Topic::CommunicationGeneral => DOMAIN_ANCHORS,
            Topic::OutOfScope => &[],
        }
    }

    pub fn answer(&self) -> &'static str {
        match self {
            Topic::BotDetection => "Fake audiences show up as numbers that do not fit together: engagement under 1% on a large account, following counts far above follower counts, or total likes below half the follower count. Run an account analysis to see each red flag scored against its niche benchmark.",
            Topic::Hooks => "The first one to three seconds decide whether a viewer stays. Open with a question, a surprising number, or a direct \"you\" statement, and show the payoff before you explain it. Cut any title cards or greetings that delay the point.",
            Topic::Storytelling => "Short-form stories work best as tension then release: state the problem in the first line, escalate with one concrete detail, and resolve with a payoff the viewer can repeat. One character, one conflict, one takeaway.",
            Topic::Algorithm => "Recommendation systems reward watch time, completion and re-watches first, then shares and saves. Post consistently, keep the first seconds tight, and judge a video by its retention curve rather than its first hour of views.",
            Topic::Hashtags => "Use three to five specific hashtags that describe the content and its audience. Broad tags like #fyp add little; niche tags help the platform classify the video and show it to the right viewers.",
            Topic::Engagement => "Engagement rate compares interactions to reach. Ask a specific question, reply to early comments, and give viewers something to save or send. Compare your rate to your niche average, not to accounts in other niches.",
            Topic::Persuasion => "Persuasion lands when emotion and evidence arrive together. Name the viewer's feeling, show proof, then make one clear ask. Two to six emotional words per hundred is usually enough; more reads as manipulation.",
            Topic::BodyLanguage => "On camera, open posture, steady eye contact with the lens and expressive hands signal confidence. Keep your face in the upper third of the frame, light it from the front, and vary your vocal tone to mark key points.",
            Topic::Language => "Keep sentences between eight and eighteen words, speak to the viewer as \"you\", and put the key word early. Captions should repeat the hook and promise the payoff, not summarize the whole video.",
            Topic::CognitiveBias => "Attention follows predictable shortcuts: social proof, scarcity, curiosity gaps and anchoring. Use them to clarify value, not to pressure. Retention improves when each beat opens a small question the next beat answers.",
            Topic::Ethics => "Trust compounds. Avoid absolute promises such as \"guaranteed\" or \"100%\", disclose sponsorships clearly, and never fake urgency. The ETH layer penalizes exaggerated claims and stacked urgency cues.",
            Topic::Monetization => "Brands pay for audience trust and fit, not raw follower counts. Keep engagement above your niche average, document your audience demographics, and keep sponsored content in the same voice and format as your organic posts.",
            Topic::CommunicationGeneral => "Clear communication on social platforms comes down to one idea per post, a hook in the first line, and a specific ask at the end. Run a text or video analysis for a layer-by-layer breakdown of your content.",
            Topic::OutOfScope => "That question is outside what this assistant covers. Ask about hooks, storytelling, engagement, the algorithm, persuasion, body language, ethics or monetization for social content.",
        }
    }
}

/// Words that tie an otherwise generic question to social content.
pub const DOMAIN_ANCHORS: &[&str] = &[
    "content", "video", "videos", "post", "posts", "audience", "creator", "creators", "follower",
    "followers", "tiktok", "instagram", "youtube", "reels", "shorts", "communicate",
    "communication", "speak", "speaking", "social", "channel", "profile", "viral",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    pub term: String,
    pub layer: Option<BiasLayer>,
    pub definition: String,
}

pub fn glossary() -> Vec<GlossaryEntry> {
    let mut entries: Vec<GlossaryEntry> = BiasLayer::ALL
        .into_iter()
        .map(|layer| GlossaryEntry {
            term: format!("{} ({})", layer.code(), layer.name()),
            layer: Some(layer),
            definition: layer_definition(layer).to_string(),
        })
        .collect();

    entries.extend([
        GlossaryEntry {
            term: "Benchmark".to_string(),
            layer: None,
            definition: "A per-niche, per-platform pair of average and top-performer values against which a raw metric is scaled to a 0-100 score.".to_string(),
        },
        GlossaryEntry {
            term: "Engagement rate".to_string(),
            layer: Some(BiasLayer::Soc),
            definition: "Interactions (likes, comments, shares, saves) as a percentage of views, or of followers when views are unknown.".to_string(),
        },
        GlossaryEntry {
            term: "Bot score".to_string(),
            layer: Some(BiasLayer::Eth),
            definition: "A 0-100 scorecard of fake-audience red flags; higher means more likely inauthentic.".to_string(),
        },
    ]);
    entries
}

fn layer_definition(layer: BiasLayer) -> &'static str {
    match layer {
        BiasLayer::Vbm => "How visual and behavioral cues (faces, motion, emoji, thumbnails) convert attention into reactions.",
        BiasLayer::Epm => "How emotional framing drives sharing and commenting.",
        BiasLayer::Nlp => "Sentence length, direct address and narrative structure of captions, scripts and bios.",
        BiasLayer::Eth => "Authenticity of the audience and honesty of the claims made.",
        BiasLayer::Eco => "Fit with platform mechanics: hashtags, posting volume and discoverability.",
        BiasLayer::Soc => "Social proof and conversation: engagement and comments relative to reach.",
        BiasLayer::Cog => "Attention and cognitive load: hooks, length and watch-through.",
        BiasLayer::Bmil => "Calls to action, saves and shares that turn viewers into a repeatable influence loop.",
    }
}
