//! Message templates of the advisor. Rendered with tera; names without an
//! `.html` suffix so nothing is autoescaped.

pub(super) const WELCOME_GREETING: &str = "welcome/greeting.txt";
pub(super) const WELCOME_PACK: &str = "welcome/pack.txt";
pub(super) const WELCOME_START: &str = "welcome/start.txt";
pub(super) const ANALYSIS: &str = "reveal/analysis.txt";
pub(super) const PICK_INTRO: &str = "reveal/pick_intro.txt";
pub(super) const PICK_TRAINING: &str = "reveal/pick_training.txt";
pub(super) const PICK_CLOSING: &str = "reveal/pick_closing.txt";
pub(super) const TRAINING: &str = "reveal/training.txt";
pub(super) const MARKET: &str = "reveal/market.txt";
pub(super) const ALTERNATIVE: &str = "reveal/alternative.txt";
pub(super) const NEXT_STEPS: &str = "reveal/next_steps.txt";

pub(super) const TEMPLATES: &[(&str, &str)] = &[
    (WELCOME_GREETING, "Hola 👋\nSoy el asesor digital de {{ brand }}."),
    (
        WELCOME_PACK,
        "Te ayudo a definir el pack más adecuado para tu clínica:\n\
         escáner intraoral + dispositivo de trabajo + formación.",
    ),
    (WELCOME_START, "Si te parece, empezamos con unas preguntas rápidas."),
    (ANALYSIS, "Analizando tus necesidades... 🧠"),
    (
        PICK_INTRO,
        "Gracias por la información.\n\n\
         Según lo que me indicas, el pack que mejor encaja contigo es:",
    ),
    (PICK_TRAINING, "Formación {{ brand }} adaptada a tu clínica"),
    (
        PICK_CLOSING,
        "Es una combinación pensada para trabajar con seguridad y fluidez desde el primer día.",
    ),
    (
        TRAINING,
        "La formación {{ brand }} no es una sesión puntual.\n\n\
         Se realiza de forma progresiva, en varias sesiones, para que el equipo pueda \
         practicar, asimilar conceptos y avanzar de manera natural.\n\n\
         Siempre orientada a clínica real y a vuestro flujo de trabajo.",
    ),
    (
        MARKET,
        "A nivel de mercado, este modelo se sitúa en la gama equivalente a otros escáneres \
         profesionales de referencia.\n\n\
         En {{ brand }} trabajamos este equipo por su fiabilidad y encaje en clínica real.",
    ),
    (
        ALTERNATIVE,
        "Como alternativa dentro de {{ brand }}, también podrías valorar:\n\
         👉 {{ alternative_name }}\n\n\
         Es una opción similar en {{ similarity }}, con diferencias principalmente en \
         {{ difference }}.\n\n\
         Si quieres, puedo ayudarte a compararlos.",
    ),
    (
        NEXT_STEPS,
        "Si lo deseas, puedo:\n\n\
         1️⃣ Ponerte en contacto con un asesor {{ brand }}\n\
         2️⃣ Preparar una propuesta personalizada del pack\n\
         3️⃣ Resolver alguna duda concreta ahora\n\n\
         Dime cómo prefieres continuar.",
    ),
];
