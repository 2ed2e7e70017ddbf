//! Static showcase content for the public screen. Nothing here touches the network.

/// Featured exhibit card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturedExhibit {
    pub title: &'static str,
    pub period: &'static str,
    pub image: &'static str,
    pub description: &'static str,
}

/// Virtual tour card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeaturedTour {
    pub title: &'static str,
    pub duration: &'static str,
    pub viewers: u32,
}

const CDN: &str = "https://cdn.poehali.dev/projects/8a771729-5b69-449c-843a-a57495ac4956/files";

pub const FEATURED_EXHIBITS: [FeaturedExhibit; 3] = [
    FeaturedExhibit {
        title: "Antique Sculpture",
        period: "3rd century BC",
        image: "10997e98-cb29-410d-957c-0569786a3cdb.jpg",
        description: "Marble statue from the ancient Greek period",
    },
    FeaturedExhibit {
        title: "Gold of the Pharaohs",
        period: "14th century BC",
        image: "07f8b567-658f-4740-b7ce-c505eae126de.jpg",
        description: "Golden mask of an Egyptian ruler",
    },
    FeaturedExhibit {
        title: "Knight's Armour",
        period: "15th century AD",
        image: "34847715-07f9-41ce-a7e8-d4ee2b7d8683.jpg",
        description: "A complete set of medieval plate armour",
    },
];

pub const FEATURED_TOURS: [FeaturedTour; 3] = [
    FeaturedTour {
        title: "Hall of Antiquity",
        duration: "25 minutes",
        viewers: 1250,
    },
    FeaturedTour {
        title: "Egyptian Collection",
        duration: "30 minutes",
        viewers: 2100,
    },
    FeaturedTour {
        title: "The Middle Ages",
        duration: "20 minutes",
        viewers: 890,
    },
];

pub const HERO_BADGE: &str = "Discover the world of art";
pub const HERO_TITLE: &str = "A Journey Through the Ages";
pub const HERO_TAGLINE: &str =
    "Explore thousands of years of human history through unique exhibits and interactive virtual tours";
pub const MOTTO: &str = "Preserving history for future generations";

/// Footer columns on the About section: (heading, entries)
pub const FOOTER: [(&str, &[&str]); 3] = [
    ("Navigation", &["About the museum", "Exhibits", "Tours", "Contacts"]),
    ("Information", &["Opening hours", "Tickets", "Visitor rules", "FAQ"]),
    ("Contacts", &["Moscow, 1 Muzeynaya St.", "+7 (495) 123-45-67", "info@museum.ru"]),
];

impl FeaturedExhibit {
    /// Absolute URL of the exhibit picture
    pub fn image_url(&self) -> String {
        format!("{}/{}", CDN, self.image)
    }
}
