pub const FIRST_NAMES: &[&str] = &[
	"Ahmet", "Mehmet", "Mustafa", "Ali", "Hüseyin", "Hasan", "İbrahim", "İsmail", "Ömer", "Yusuf",
	"Fatma", "Ayşe", "Emine", "Hatice", "Zeynep", "Elif", "Meryem", "Büşra", "Seda", "Özge", "Can",
	"Ege", "Arda", "Kaan", "Berk", "Deniz", "Cem", "Onur", "Burak", "Emre", "İrem", "Dila", "Selin",
	"Nisa", "Ece", "Defne", "Ela", "Ada", "Nehir", "Lara",
];

pub const LAST_NAMES: &[&str] = &[
	"Yılmaz", "Kaya", "Demir", "Şahin", "Çelik", "Yıldız", "Yıldırım", "Öztürk", "Aydın",
	"Özdemir", "Arslan", "Doğan", "Kılıç", "Aslan", "Çetin", "Kara", "Koç", "Kurt", "Özkan",
	"Şimşek", "Erdoğan", "Güneş", "Akın", "Avcı", "Polat", "Bulut", "Kaplan", "Çakır", "Özer",
	"Turan",
];

pub const CITIES: &[&str] = &[
	"İstanbul", "Ankara", "İzmir", "Bursa", "Antalya", "Adana", "Konya", "Gaziantep", "Mersin",
	"Diyarbakır", "Kayseri", "Eskişehir", "Urfa", "Malatya", "Erzurum", "Van", "Batman", "Elazığ",
	"İçel", "Tokat", "Sivas", "Trabzon", "Balıkesir", "Kahramanmaraş", "Manisa", "Bolu", "Aydın",
	"Tekirdağ", "Sakarya", "Denizli",
];

pub const SCHOOL_TYPES: &[&str] = &[
	"İlkokulu",
	"Ortaokulu",
	"Lisesi",
	"Anadolu Lisesi",
	"Fen Lisesi",
	"Meslek Lisesi",
];

/// Namesakes schools are commonly named after; `None` stands for the city.
pub const SCHOOL_NAMESAKES: &[Option<&str>] = &[
	None,
	Some("Atatürk"),
	Some("Cumhuriyet"),
	Some("Fatih"),
	Some("Gazi"),
	Some("İstiklal"),
	Some("Mehmet Akif"),
	Some("Namık Kemal"),
	Some("Yunus Emre"),
	Some("Mimar Sinan"),
];

pub const SUBJECTS: &[&str] = &[
	"Matematik",
	"Türkçe",
	"Fen Bilgisi",
	"Sosyal Bilgiler",
	"İngilizce",
	"Beden Eğitimi",
	"Resim",
	"Müzik",
];

pub const CLASS_NAMES: &[&str] = &[
	"1-A", "1-B", "2-A", "2-B", "3-A", "3-B", "4-A", "4-B", "5-A", "5-B",
];

pub const PROGRESS_STATUSES: &[&str] = &["Excellent", "Good", "Average", "Needs Improvement"];

pub const ACADEMIC_YEAR: &str = "2024-2025";
