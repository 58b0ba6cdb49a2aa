use crate::domain::product::{MainUse, PriceTier, Product};
use crate::domain::question::{Choice, Question};

#[derive(Debug, Clone, Copy)]
struct ProductSeed {
    id: &'static str,
    name: &'static str,
    tagline: &'static str,
    description: &'static str,
    features: [&'static str; 3],
    image_url: &'static str,
    price_tier: PriceTier,
    main_use: MainUse,
    device: &'static str,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "medit_i700",
        name: "Medit i700",
        tagline: "El equilibrio perfecto.",
        description: "Rendimiento probado y versatilidad total.",
        features: ["Alta velocidad", "Desinfección UV-C", "Plug & Play"],
        image_url: "https://placehold.co/800x600/f0f9ff/3B82F6?text=MEDIT+i700%0AStandard&font=roboto",
        price_tier: PriceTier::Mid,
        main_use: MainUse::General,
        device: "Portátil de alto rendimiento",
    },
    ProductSeed {
        id: "medit_i900_classic",
        name: "Medit i900 Classic",
        tagline: "Potencia de nueva generación.",
        description: "Motor óptico Gen 3 con control físico.",
        features: ["Motor Gen 3", "Botones físicos", "Ultraligero (165g)"],
        image_url: "https://placehold.co/800x600/f0f9ff/2563EB?text=MEDIT+i900%0AClassic&font=roboto",
        price_tier: PriceTier::High,
        main_use: MainUse::Restorative,
        device: "Portátil de alto rendimiento",
    },
    ProductSeed {
        id: "medit_i900_touch",
        name: "Medit i900 Touch",
        tagline: "Innovación premium.",
        description: "Interfaz 100% táctil y diseño unibody.",
        features: ["Interfaz táctil 360°", "Diseño Unibody", "Máxima higiene"],
        image_url: "https://placehold.co/800x600/f0f9ff/1D4ED8?text=MEDIT+i900%0ATouch&font=roboto",
        price_tier: PriceTier::Premium,
        main_use: MainUse::Aesthetic,
        device: "Portátil de alto rendimiento",
    },
    ProductSeed {
        id: "medit_i900_mobility",
        name: "Medit i900 Mobility",
        tagline: "Libertad absoluta.",
        description: "Escanea directamente en iPad sin cables.",
        features: ["Conexión a iPad", "Sin cables", "Portabilidad total"],
        image_url: "https://placehold.co/800x600/f0f9ff/007AFF?text=MEDIT+i900%0AMobility&font=roboto",
        price_tier: PriceTier::Premium,
        main_use: MainUse::Mobility,
        device: "iPad Pro / MacBook",
    },
    ProductSeed {
        id: "shining_elite",
        name: "Shining 3D Elite",
        tagline: "Especialista en implantes.",
        description: "Solución 2 en 1: Escáner + Fotogrametría.",
        features: ["Tecnología IPG", "Precisión implantes", "Punta edéntulos"],
        image_url: "https://placehold.co/800x600/fff7ed/CA8A04?text=SHINING+3D%0AElite&font=roboto",
        price_tier: PriceTier::Specialized,
        main_use: MainUse::Implantology,
        device: "PC de alto rendimiento",
    },
    ProductSeed {
        id: "shining_elf",
        name: "Shining 3D ELF",
        tagline: "Ligereza inteligente.",
        description: "Solo 106g. Ideal para empezar con IA.",
        features: ["Peso pluma (106g)", "IA tejidos blandos", "Económico"],
        image_url: "https://placehold.co/800x600/f0fdfa/14B8A6?text=SHINING+3D%0AELF&font=roboto",
        price_tier: PriceTier::Economy,
        main_use: MainUse::Entry,
        device: "Portátil certificado",
    },
    ProductSeed {
        id: "panda_smart",
        name: "Panda Smart",
        tagline: "Calidad-precio imbatible.",
        description: "Precisión 7μm por una inversión mínima.",
        features: ["Ultraligero (138g)", "Precisión 7μm", "Sin suscripciones"],
        image_url: "https://placehold.co/800x600/f0f9ff/0EA5E9?text=PANDA%0ASmart&font=roboto",
        price_tier: PriceTier::Economy,
        main_use: MainUse::General,
        device: "Portátil certificado",
    },
];

#[derive(Debug, Clone, Copy)]
struct ChoiceSeed {
    label: &'static str,
    weights: &'static [(&'static str, u32)],
}

#[derive(Debug, Clone, Copy)]
struct QuestionSeed {
    id: &'static str,
    prompt: &'static str,
    choices: &'static [ChoiceSeed],
}

const QUESTION_SEEDS: &[QuestionSeed] = &[
    QuestionSeed {
        id: "location",
        prompt: "Para orientarte correctamente:\n\n¿Dónde trabajarás principalmente con el escáner?",
        choices: &[
            ChoiceSeed {
                label: "1️⃣ Clínica dental",
                weights: &[
                    ("panda_smart", 1),
                    ("shining_elf", 1),
                    ("medit_i700", 1),
                    ("medit_i900_touch", 1),
                ],
            },
            ChoiceSeed {
                label: "2️⃣ Laboratorio",
                weights: &[("medit_i900_classic", 3), ("shining_elite", 2), ("medit_i700", 1)],
            },
            ChoiceSeed {
                label: "3️⃣ Uso mixto",
                weights: &[("medit_i700", 3), ("medit_i900_classic", 1), ("medit_i900_mobility", 1)],
            },
        ],
    },
    QuestionSeed {
        id: "experience",
        prompt: "¿Cuál es tu nivel de experiencia con escáneres intraorales?",
        choices: &[
            ChoiceSeed {
                label: "1️⃣ Primera experiencia",
                weights: &[("shining_elf", 3), ("panda_smart", 3), ("medit_i700", 2)],
            },
            ChoiceSeed {
                label: "2️⃣ Uso habitual",
                weights: &[("medit_i700", 3), ("medit_i900_classic", 2)],
            },
            ChoiceSeed {
                label: "3️⃣ Usuario avanzado",
                weights: &[
                    ("medit_i900_touch", 3),
                    ("medit_i900_mobility", 3),
                    ("shining_elite", 2),
                    ("medit_i900_classic", 2),
                ],
            },
        ],
    },
    QuestionSeed {
        id: "priorities",
        prompt: "¿Qué valoras más en un escáner?",
        choices: &[
            ChoiceSeed {
                label: "1️⃣ Movilidad y libertad de uso",
                weights: &[("medit_i900_mobility", 5), ("shining_elf", 2), ("panda_smart", 1)],
            },
            ChoiceSeed {
                label: "2️⃣ Máxima precisión",
                weights: &[("shining_elite", 5), ("medit_i900_classic", 4), ("medit_i900_touch", 3)],
            },
            ChoiceSeed {
                label: "3️⃣ Rapidez de escaneado",
                weights: &[
                    ("medit_i900_touch", 3),
                    ("medit_i900_classic", 3),
                    ("medit_i900_mobility", 3),
                    ("medit_i700", 2),
                ],
            },
            ChoiceSeed {
                label: "4️⃣ Equilibrio general",
                weights: &[("medit_i700", 5), ("panda_smart", 3), ("shining_elf", 2)],
            },
        ],
    },
    QuestionSeed {
        id: "role",
        prompt: "¿Para qué perfil clínico buscamos el escáner?",
        choices: &[
            ChoiceSeed {
                label: "Odontología General / Restauradora 🦷",
                weights: &[
                    ("panda_smart", 3),
                    ("medit_i700", 2),
                    ("medit_i900_classic", 2),
                    ("shining_elf", 2),
                ],
            },
            ChoiceSeed {
                label: "Implantología Avanzada 🔩",
                weights: &[("shining_elite", 5), ("medit_i900_touch", 1)],
            },
            ChoiceSeed {
                label: "Ortodoncia / Estética ✨",
                weights: &[("medit_i900_touch", 2), ("medit_i900_mobility", 2), ("panda_smart", 1)],
            },
            ChoiceSeed {
                label: "Higiene / Revisiones rápidas ⏱️",
                weights: &[("shining_elf", 3), ("panda_smart", 3)],
            },
        ],
    },
    QuestionSeed {
        id: "budget",
        prompt: "¿Cuál es la prioridad en cuanto a inversión?",
        choices: &[
            ChoiceSeed {
                label: "Opción económica y funcional 💶",
                weights: &[("shining_elf", 3), ("panda_smart", 4), ("medit_i700", 1)],
            },
            ChoiceSeed {
                label: "Mejor calidad-precio ⚖️",
                weights: &[("panda_smart", 5), ("medit_i700", 3), ("medit_i900_classic", 1)],
            },
            ChoiceSeed {
                label: "Lo mejor del mercado (Premium) 🚀",
                weights: &[("medit_i900_touch", 3), ("medit_i900_mobility", 3), ("shining_elite", 2)],
            },
        ],
    },
    QuestionSeed {
        id: "ecosystem",
        prompt: "¿En qué ecosistema te sientes más cómodo trabajando?",
        choices: &[
            ChoiceSeed {
                label: "Entorno PC / Ordenador potente 💻",
                weights: &[
                    ("medit_i900_classic", 3),
                    ("shining_elite", 3),
                    ("medit_i900_touch", 2),
                    ("medit_i700", 2),
                    ("panda_smart", 2),
                ],
            },
            ChoiceSeed {
                label: "Tablet / iPad ligero 📱",
                weights: &[("medit_i900_mobility", 5)],
            },
            ChoiceSeed {
                label: "Movilidad total (100% inalámbrico) 🛜",
                weights: &[("medit_i900_mobility", 5), ("medit_i900_touch", 1)],
            },
        ],
    },
    QuestionSeed {
        id: "mobility",
        prompt: "¿Cómo de importante es la movilidad física del equipo?",
        choices: &[
            ChoiceSeed {
                label: "Fijo en un gabinete 🖥️",
                weights: &[("medit_i700", 1), ("shining_elite", 1), ("panda_smart", 1)],
            },
            ChoiceSeed {
                label: "Mover entre gabinetes (Carrito) 🛒",
                weights: &[
                    ("panda_smart", 3),
                    ("medit_i700", 1),
                    ("medit_i900_classic", 1),
                    ("shining_elf", 2),
                ],
            },
            ChoiceSeed {
                label: "Movilidad total (En mano) 👋",
                weights: &[("medit_i900_mobility", 3)],
            },
        ],
    },
    QuestionSeed {
        id: "interface",
        prompt: "¿Preferencia de uso?",
        choices: &[
            ChoiceSeed {
                label: "Botones físicos (Clásico) 🔘",
                weights: &[
                    ("medit_i900_classic", 3),
                    ("medit_i700", 2),
                    ("panda_smart", 2),
                    ("shining_elf", 1),
                ],
            },
            ChoiceSeed {
                label: "Interfaz táctil / Gestos 👆",
                weights: &[("medit_i900_touch", 4)],
            },
            ChoiceSeed {
                label: "Indiferente 🤷",
                weights: &[("panda_smart", 2), ("medit_i700", 1), ("shining_elite", 1)],
            },
        ],
    },
];

pub(super) fn products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| {
            Product::new(seed.id, seed.name, seed.price_tier, seed.main_use)
                .with_tagline(seed.tagline)
                .with_description(seed.description)
                .with_features(seed.features)
                .with_image_url(seed.image_url)
                .with_device(seed.device)
        })
        .collect()
}

pub(super) fn questions() -> Vec<Question> {
    QUESTION_SEEDS
        .iter()
        .map(|seed| {
            let choices = seed
                .choices
                .iter()
                .map(|choice| {
                    choice
                        .weights
                        .iter()
                        .fold(Choice::new(choice.label), |acc, (id, weight)| {
                            acc.with_weight(*id, *weight)
                        })
                })
                .collect();
            Question::new(seed.id, seed.prompt, choices)
        })
        .collect()
}
